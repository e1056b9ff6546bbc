use crate::utils::error::{AuditError, Result};
use regex::{Captures, Regex};
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;

const DOCUMENT_XML: &str = "word/document.xml";

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:p[\s>].*?</w:p>").expect("paragraph regex"));

/// 表格起訖標籤，用於略過表格（含巢狀表格）內的段落
static TABLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:tbl[\s>]|</w:tbl>").expect("table tag regex"));

static RUN_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>|<w:(?:br|cr)(?:\s[^>]*)?/>")
        .expect("run content regex")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);").expect("entity regex")
});

/// 從 DOCX 取出本文段落文字：逐段去除首尾空白，略過空段落與表格，保留文件順序
pub fn load_paragraphs(source: &str, bytes: &[u8]) -> Result<Vec<String>> {
    let xml = strip_tables(&read_document_xml(source, bytes)?);

    let paragraphs: Vec<String> = PARAGRAPH
        .find_iter(&xml)
        .map(|m| paragraph_text(m.as_str()))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    tracing::debug!("Read {} non-empty paragraphs from {}", paragraphs.len(), source);
    Ok(paragraphs)
}

/// 法規 DOCX：段落以換行串成單一文字區塊
pub fn load_statute_docx(source: &str, bytes: &[u8]) -> Result<String> {
    Ok(load_paragraphs(source, bytes)?.join("\n"))
}

/// 法規純文字檔，原樣讀入
pub fn load_statute_text(source: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| AuditError::document(source, format!("not valid UTF-8: {}", e)))
}

/// 依副檔名選擇法規的讀取方式
pub fn load_statute(source: &str, bytes: Vec<u8>) -> Result<String> {
    let extension = Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("docx") => load_statute_docx(source, &bytes),
        Some("txt") => load_statute_text(source, bytes),
        other => Err(AuditError::document(
            source,
            format!(
                "unsupported statute format '{}', expected .docx or .txt",
                other.unwrap_or("")
            ),
        )),
    }
}

fn read_document_xml(source: &str, bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AuditError::document(source, format!("not a DOCX archive: {}", e)))?;

    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| AuditError::document(source, format!("missing {}", DOCUMENT_XML)))?;

    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

/// 移除所有 `<w:tbl>` 區塊，只保留最外層本文
fn strip_tables(xml: &str) -> String {
    let mut body = String::with_capacity(xml.len());
    let mut depth = 0usize;
    let mut copied_until = 0;

    for tag in TABLE_TAG.find_iter(xml) {
        if tag.as_str().starts_with("</") {
            if depth > 0 {
                depth -= 1;
                if depth == 0 {
                    copied_until = tag.end();
                }
            }
        } else {
            if depth == 0 {
                body.push_str(&xml[copied_until..tag.start()]);
            }
            depth += 1;
        }
    }

    if depth == 0 {
        body.push_str(&xml[copied_until..]);
    } else {
        tracing::warn!("⚠️ Unterminated table in document body, ignoring its content");
    }
    body
}

fn paragraph_text(paragraph_xml: &str) -> String {
    let mut text = String::new();
    for caps in RUN_CONTENT.captures_iter(paragraph_xml) {
        match caps.get(1) {
            Some(run) => text.push_str(&decode_entities(run.as_str())),
            None if caps[0].starts_with("<w:tab") => text.push('\t'),
            None => text.push('\n'),
        }
    }
    text
}

fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
