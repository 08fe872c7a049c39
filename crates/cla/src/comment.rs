//! Comment posted when a pull request fails the CLA gate.

/// Render the "CLA not found" comment.
///
/// `about_this_bot` is embedded verbatim inside a collapsed `<details>` block.
#[must_use]
pub fn not_signed(instructions_url: &str, about_this_bot: &str) -> String {
    format!(
        "Thanks for your pull request. Before we can look at your pull request, \
you'll need to finish a Contributor License Agreement (CLA).

:memo: **Please follow instructions at <{instructions_url}> to complete the CLA.**

<details>

{about_this_bot}
</details>
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_signed_comment() {
        let body = not_signed(
            "https://example.org/docs/CLA.md",
            "I am a bot. Ask the maintainers about me.",
        );

        assert!(body.starts_with("Thanks for your pull request."));
        assert!(body.contains("Contributor License Agreement (CLA)"));
        assert!(body.contains(
            ":memo: **Please follow instructions at <https://example.org/docs/CLA.md> to complete the CLA.**"
        ));
        assert!(body.ends_with(
            "<details>\n\nI am a bot. Ask the maintainers about me.\n</details>\n"
        ));
    }
}
