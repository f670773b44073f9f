use crate::error::Result;
use crate::frontmatter::{source_preamble_len, ExtractedBlock, Frontmatter};
use crate::types::FileType;

/// Serialize the mapping as block-style YAML, newline-terminated.
pub fn render_yaml(frontmatter: &Frontmatter) -> Result<String> {
    let mut yaml = serde_yaml::to_string(frontmatter.mapping())?;
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(yaml)
}

/// `\r\n` if the first line of `text` ends with one, else `\n`.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Wrap rendered YAML in the envelope for `file_type`, with lines ending in
/// `eol`. `terminator` is what follows the closing `---` (a line ending,
/// `"""`, or nothing).
pub fn render_block(
    frontmatter: &Frontmatter,
    file_type: FileType,
    terminator: &str,
    eol: &str,
) -> Result<String> {
    let mut yaml = render_yaml(frontmatter)?;
    if eol != "\n" {
        yaml = yaml.replace('\n', eol);
    }
    let open = match file_type {
        FileType::Markdown => "---",
        FileType::Source => "\"\"\"---",
    };
    Ok(format!("{open}{eol}{yaml}---{terminator}"))
}

/// Replace the frontmatter of `content` located by `block`. Every byte
/// outside the block's span is kept as-is.
pub fn rewrite(
    content: &str,
    block: &ExtractedBlock,
    file_type: FileType,
    frontmatter: &Frontmatter,
) -> Result<String> {
    let eol = line_ending(&content[block.start..block.end]);
    let rendered = render_block(frontmatter, file_type, &block.terminator, eol)?;
    let mut out = String::with_capacity(content.len() + rendered.len());
    out.push_str(&content[..block.start]);
    out.push_str(&rendered);
    out.push_str(&content[block.end..]);
    Ok(out)
}

/// Add a new frontmatter block to `content`, which has none. The block goes
/// first, after a byte-order mark in markdown or after the leading `#` lines
/// (shebang, encoding) in source files, and uses the file's line ending.
pub fn inject(content: &str, file_type: FileType, frontmatter: &Frontmatter) -> Result<String> {
    let eol = line_ending(content);
    let (head, body) = match file_type {
        FileType::Markdown => {
            let bom = if content.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
            content.split_at(bom)
        }
        FileType::Source => content.split_at(source_preamble_len(content)),
    };
    let close = match file_type {
        FileType::Markdown => "",
        FileType::Source => "\"\"\"",
    };
    let rendered = render_block(frontmatter, file_type, &format!("{close}{eol}"), eol)?;

    let mut out = String::with_capacity(content.len() + rendered.len() + 4);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') && !head.ends_with('\u{feff}') {
        out.push_str(eol);
    }
    out.push_str(&rendered);
    out.push_str(eol);
    out.push_str(body);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrontmatterDefaults;
    use crate::correct::auto_correct;
    use crate::frontmatter::{extract, parse};

    #[test]
    fn rewrite_keeps_body_verbatim() {
        let content = "---\ntags: doc\nprovides: []\nrequires: []\n---\n\n# Title\n\nBody text.\n";
        let block = extract(content, FileType::Markdown).unwrap();
        let fm = parse(&block.yaml).unwrap();
        let corrected = auto_correct(&fm, &FrontmatterDefaults::default());
        let out = rewrite(content, &block, FileType::Markdown, &corrected.frontmatter).unwrap();

        assert!(out.starts_with("---\ntags:\n- doc\n"));
        assert!(out.ends_with("---\n\n# Title\n\nBody text.\n"));
        let again = extract(&out, FileType::Markdown).unwrap();
        assert_eq!(parse(&again.yaml).unwrap().tags(), vec!["doc"]);
    }

    #[test]
    fn rewriting_valid_frontmatter_is_semantically_stable() {
        let content = "---\ntags: [a, b]\nprovides: [x]\nrequires: []\nstatus: active\n---\nbody\n";
        let block = extract(content, FileType::Markdown).unwrap();
        let fm = parse(&block.yaml).unwrap();
        let out = rewrite(content, &block, FileType::Markdown, &fm).unwrap();

        let new_block = extract(&out, FileType::Markdown).unwrap();
        assert_eq!(parse(&new_block.yaml).unwrap(), fm);
        assert_eq!(&out[new_block.end..], "body\n");

        // A second rewrite is byte-for-byte identical to the first.
        let twice = rewrite(&out, &new_block, FileType::Markdown, &fm).unwrap();
        assert_eq!(twice, out);
    }

    #[test]
    fn source_rewrite_keeps_shebang_and_docstring_tail() {
        let content = "#!/usr/bin/env python\n\"\"\"---\ntags: tool\nprovides: []\nrequires: []\n---\nDoes things.\n\"\"\"\nimport os\n";
        let block = extract(content, FileType::Source).unwrap();
        let mut fm = parse(&block.yaml).unwrap();
        fm.set_list(crate::types::RequiredField::Tags, &["tool".to_string()]);
        let out = rewrite(content, &block, FileType::Source, &fm).unwrap();

        assert!(out.starts_with("#!/usr/bin/env python\n\"\"\"---\ntags:\n- tool\n"));
        assert!(out.ends_with("---\nDoes things.\n\"\"\"\nimport os\n"));
    }

    #[test]
    fn source_rewrite_keeps_inline_close() {
        let content = "\"\"\"---\ntags: []\n---\"\"\"\n\nimport sys\n";
        let block = extract(content, FileType::Source).unwrap();
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let out = rewrite(content, &block, FileType::Source, &fm).unwrap();
        assert!(out.contains("---\"\"\"\n\nimport sys\n"));
        assert!(extract(&out, FileType::Source).is_some());
    }

    #[test]
    fn inject_markdown() {
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let out = inject("# Title\n", FileType::Markdown, &fm).unwrap();
        assert_eq!(
            out,
            "---\ntags:\n- draft\nprovides: []\nrequires: []\n---\n\n# Title\n"
        );
    }

    #[test]
    fn inject_source_keeps_shebang_and_encoding_first() {
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let src = "#!/usr/bin/env python\n# -*- coding: latin-1 -*-\nimport os\n";
        let out = inject(src, FileType::Source, &fm).unwrap();

        assert!(out.starts_with("#!/usr/bin/env python\n# -*- coding: latin-1 -*-\n\"\"\"---\n"));
        assert!(out.ends_with("---\"\"\"\n\nimport os\n"));
        let block = extract(&out, FileType::Source).unwrap();
        assert_eq!(parse(&block.yaml).unwrap().tags(), vec!["draft"]);
    }

    #[test]
    fn inject_after_shebang_without_newline() {
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let out = inject("#!/bin/sh", FileType::Source, &fm).unwrap();
        assert!(out.starts_with("#!/bin/sh\n\"\"\"---\n"));
        assert!(extract(&out, FileType::Source).is_some());
    }

    #[test]
    fn crlf_files_keep_crlf_on_rewrite() {
        let content = "---\r\ntags: doc\r\nprovides: []\r\nrequires: []\r\n---\r\nbody\r\n";
        let block = extract(content, FileType::Markdown).unwrap();
        let fm = parse(&block.yaml).unwrap();
        let corrected = auto_correct(&fm, &FrontmatterDefaults::default());
        let out = rewrite(content, &block, FileType::Markdown, &corrected.frontmatter).unwrap();

        assert_eq!(
            out,
            "---\r\ntags:\r\n- doc\r\nprovides: []\r\nrequires: []\r\n---\r\nbody\r\n"
        );
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn crlf_files_keep_crlf_on_inject() {
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let out = inject("# Title\r\n", FileType::Markdown, &fm).unwrap();
        assert_eq!(
            out,
            "---\r\ntags:\r\n- draft\r\nprovides: []\r\nrequires: []\r\n---\r\n\r\n# Title\r\n"
        );
    }

    #[test]
    fn inject_source() {
        let fm = FrontmatterDefaults::default().to_frontmatter();
        let out = inject("import os\n", FileType::Source, &fm).unwrap();
        assert!(out.starts_with("\"\"\"---\ntags:\n- draft\n"));
        assert!(out.ends_with("---\"\"\"\n\nimport os\n"));
        let block = extract(&out, FileType::Source).unwrap();
        assert_eq!(parse(&block.yaml).unwrap().tags(), vec!["draft"]);
    }
}
