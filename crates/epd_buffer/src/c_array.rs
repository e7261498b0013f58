//! C source rendering of a packed buffer.
//!
//! Downstream firmware builds compile the output directly, so the layout is
//! fixed: `unsigned char <name>[] = {0xAB, 0xCD,};` with a trailing comma after
//! every byte and no newline.

use crate::{EpdError, Result};
use std::fmt::Write;

/// Render `bytes` as a C `unsigned char` array named `name`.
#[must_use = "this returns the rendered C source"]
pub fn render_c_array(name: &str, bytes: &[u8]) -> Result<String> {
    if !is_c_identifier(name) {
        return Err(EpdError::InvalidArrayName(name.to_string()));
    }

    // "0xNN, " per byte plus declaration
    let mut out = String::with_capacity(bytes.len() * 6 + name.len() + 24);
    out.push_str("unsigned char ");
    out.push_str(name);
    out.push_str("[] = {");
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail
        let _ = write!(out, "0x{byte:02X},");
    }
    out.push_str("};");
    Ok(out)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let src = render_c_array("output", &[0xFF, 0x0a, 0x7F]).unwrap();
        assert_eq!(src, "unsigned char output[] = {0xFF, 0x0A, 0x7F,};");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_c_array("img", &[]).unwrap(),
            "unsigned char img[] = {};"
        );
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_c_identifier("output"));
        assert!(is_c_identifier("_cat_gray4"));
        assert!(is_c_identifier("img2"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("2img"));
        assert!(!is_c_identifier("my-image"));
        assert!(matches!(
            render_c_array("bad name", &[0]),
            Err(EpdError::InvalidArrayName(_))
        ));
    }
}
