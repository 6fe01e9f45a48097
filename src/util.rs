use proc_macro2::TokenStream;

use crate::Error;

pub(crate) fn escape_rust_keyword<T>(string: T) -> String
where
    T: ToString,
{
    let string = string.to_string();
    if RUST_KEYWORDS.iter().any(|s| s.eq(&string)) {
        format!("r#{string}")
    } else if RUST_SPECIAL_KEYWORDS.iter().any(|s| s.eq(&string)) {
        format!("{string}_")
    } else {
        string
    }
}

pub(crate) const RUST_KEYWORDS: [&str; 49] = [
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "super", "trait", "true", "type", "union", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

pub(crate) const RUST_SPECIAL_KEYWORDS: [&str; 3] = ["crate", "Self", "self"];

/// Pretty-prints one item group through `prettyplease` so emitted sources
/// look hand-formatted instead of token-stream flat.
pub(crate) fn render_block(block: TokenStream) -> Result<String, Error> {
    let file = syn::parse2::<syn::File>(block)?;
    Ok(prettyplease::unparse(&file)
        .trim_end_matches('\n')
        .to_owned())
}

pub(crate) fn finish(content: String) -> String {
    format!("{content}\n")
}
