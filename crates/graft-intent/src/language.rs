//! Fence-tag normalization.

/// Maps common short fence tags to canonical editor language identifiers.
///
/// Unknown tags pass through lowercased; an untitled buffer with a slightly
/// wrong language id beats no buffer at all.
pub fn normalize_language(tag: &str) -> String {
    const ALIASES: &[(&str, &str)] = &[
        ("js", "javascript"),
        ("jsx", "javascriptreact"),
        ("ts", "typescript"),
        ("tsx", "typescriptreact"),
        ("py", "python"),
        ("rb", "ruby"),
        ("rs", "rust"),
        ("kt", "kotlin"),
        ("cs", "csharp"),
        ("c++", "cpp"),
        ("sh", "shellscript"),
        ("bash", "shellscript"),
        ("zsh", "shellscript"),
        ("yml", "yaml"),
        ("md", "markdown"),
        ("tf", "terraform"),
        ("dockerfile", "dockerfile"),
        ("docker", "dockerfile"),
        ("golang", "go"),
    ];

    let tag = tag.trim();
    for (alias, canonical) in ALIASES {
        if tag.eq_ignore_ascii_case(alias) {
            return (*canonical).to_string();
        }
    }
    tag.to_ascii_lowercase()
}
