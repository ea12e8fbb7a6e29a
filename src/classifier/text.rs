use serde::de::IgnoredAny;

/// 文本内容的细分类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextKind {
    Json,
    Html,
    Xml,
    Csv,
    Python,
    Shell,
    Plain,
}

impl TextKind {
    pub fn label(self) -> &'static str {
        match self {
            TextKind::Json => "json",
            TextKind::Html => "html",
            TextKind::Xml => "xml",
            TextKind::Csv => "csv",
            TextKind::Python => "python",
            TextKind::Shell => "shell",
            TextKind::Plain => "txt",
        }
    }

    /// 用于 MIME 查表的扩展名
    pub fn extension(self) -> &'static str {
        match self {
            TextKind::Json => "json",
            TextKind::Html => "html",
            TextKind::Xml => "xml",
            TextKind::Csv => "csv",
            TextKind::Python => "py",
            TextKind::Shell => "sh",
            TextKind::Plain => "txt",
        }
    }
}

/// 控制字符占比上限（分母）
const MAX_CONTROL_RATIO: usize = 10;

/// 判断字节是否为文本，并给出细分类别
///
/// 分块读取会在任意位置截断内容，因此结尾处不完整的 UTF-8 序列与
/// 未闭合的 JSON 都按有效前缀处理。
pub(crate) fn sniff(bytes: &[u8]) -> Option<TextKind> {
    let text = decode(bytes)?;
    let body = text.trim_start_matches('\u{feff}').trim_start();
    if body.is_empty() {
        return Some(TextKind::Plain);
    }

    if body.starts_with("<?xml") {
        return Some(TextKind::Xml);
    }
    if looks_like_html(body) {
        return Some(TextKind::Html);
    }
    if looks_like_json(body) {
        return Some(TextKind::Json);
    }
    if let Some(kind) = script_kind(body) {
        return Some(kind);
    }
    if looks_like_csv(body) {
        return Some(TextKind::Csv);
    }
    Some(TextKind::Plain)
}

fn decode(bytes: &[u8]) -> Option<&str> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        // 块尾截断的多字节字符
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };
    if text.is_empty() || text.contains('\0') {
        return None;
    }

    let mut total = 0usize;
    let mut control = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b') {
            control += 1;
        }
    }
    if control * MAX_CONTROL_RATIO > total {
        return None;
    }
    Some(text)
}

fn looks_like_html(body: &str) -> bool {
    let head = body.chars().take(32).collect::<String>().to_ascii_lowercase();
    ["<!doctype html", "<html", "<head", "<body"]
        .iter()
        .any(|tag| head.starts_with(tag))
}

fn looks_like_json(body: &str) -> bool {
    if !(body.starts_with('{') || body.starts_with('[')) {
        return false;
    }
    match serde_json::from_str::<IgnoredAny>(body) {
        Ok(_) => true,
        Err(e) => e.is_eof(),
    }
}

fn script_kind(body: &str) -> Option<TextKind> {
    let first_line = body.lines().next().unwrap_or_default();
    if let Some(interpreter) = first_line.strip_prefix("#!") {
        if interpreter.contains("python") {
            return Some(TextKind::Python);
        }
        let program = interpreter
            .split_whitespace()
            .last()
            .and_then(|p| p.rsplit('/').next())
            .unwrap_or_default();
        if matches!(program, "sh" | "bash" | "zsh" | "dash" | "ksh") {
            return Some(TextKind::Shell);
        }
        return None;
    }

    let python_start = body.lines().take(5).any(|line| {
        line.starts_with("def ")
            || line.starts_with("import ")
            || (line.starts_with("from ") && line.contains(" import "))
    });
    python_start.then_some(TextKind::Python)
}

fn looks_like_csv(body: &str) -> bool {
    let mut lines: Vec<&str> = body.lines().collect();
    // 最后一行可能被分块截断
    if !body.ends_with('\n') {
        lines.pop();
    }
    if lines.len() < 2 {
        return false;
    }
    let columns = lines[0].matches(',').count();
    columns > 0 && lines.iter().all(|line| line.matches(',').count() == columns)
}

#[cfg(test)]
mod tests {
    use super::{sniff, TextKind};

    #[test]
    fn plain_text() {
        assert_eq!(
            sniff(b"Hello, this is a test text file."),
            Some(TextKind::Plain)
        );
        assert_eq!(sniff(&[b'A'; 100]), Some(TextKind::Plain));
    }

    #[test]
    fn structured_text() {
        assert_eq!(
            sniff(br#"{"test": "data", "number": 42}"#),
            Some(TextKind::Json)
        );
        assert_eq!(
            sniff(b"<!DOCTYPE html><html><head><title>Test</title></head></html>"),
            Some(TextKind::Html)
        );
        assert_eq!(
            sniff(br#"<?xml version="1.0" encoding="UTF-8"?><root/>"#),
            Some(TextKind::Xml)
        );
        assert_eq!(
            sniff(b"name,age,city\nJohn,30,New York\nJane,25,Los Angeles"),
            Some(TextKind::Csv)
        );
    }

    #[test]
    fn scripts() {
        assert_eq!(
            sniff(b"#!/usr/bin/env python\ndef hello():\n    print('hi')\n"),
            Some(TextKind::Python)
        );
        assert_eq!(sniff(b"#!/bin/bash\necho hi\n"), Some(TextKind::Shell));
        assert_eq!(sniff(b"import os\nprint(os.name)\n"), Some(TextKind::Python));
    }

    #[test]
    fn truncated_json_is_still_json() {
        assert_eq!(
            sniff(br#"{"name": "John Doe", "address": {"street": "12"#),
            Some(TextKind::Json)
        );
    }

    #[test]
    fn trailing_garbage_is_not_json() {
        assert_eq!(sniff(b"{} and more"), Some(TextKind::Plain));
    }

    #[test]
    fn split_multibyte_character_is_text() {
        let text = "héllo wörld".as_bytes();
        // 截在 'é' 的两个字节中间
        let cut = text.iter().position(|&b| b == 0xC3).expect("first") + 1;
        assert_eq!(sniff(&text[..cut]), Some(TextKind::Plain));
        // 截在 'ö' 的两个字节中间
        let second = "héllo w".len() + 1;
        assert_eq!(sniff(&text[..second]), Some(TextKind::Plain));
    }

    #[test]
    fn binary_is_not_text() {
        assert_eq!(sniff(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(sniff(&[0xFF, 0xFE, 0x80, 0x81, 0x90]), None);
    }
}
