use crate::domain::model::ProvisionMap;
use regex::Regex;
use std::sync::LazyLock;

/// 段落標記：「§」+ 數字 + 可選字母後綴，§ 與數字間允許空白
static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"§\s*(\d+[a-zA-Z]*)").expect("section marker regex"));

/// 款標記：換行、可選空白、數字、句點
static SUBPARAGRAPH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*(\d+)\.").expect("subparagraph marker regex"));

/// 將整份法規文字切分為 `識別碼 -> 內容` 對照表。
///
/// - 第一個 § 標記之前的文字會被捨棄
/// - 沒有款標記的段落以 `§k` 為鍵，保存整段（去除首尾空白）
/// - 有款標記的段落對每一款產生 `§k, ods. n`，段落開頭到第一款之間的標題文字捨棄
/// - 結尾沒有內容的標記產生空字串條目
/// - 重複的識別碼以最後一次出現的內容為準
pub fn segment(text: &str) -> ProvisionMap {
    let mut provisions = ProvisionMap::new();

    let markers: Vec<(String, usize, usize)> = SECTION_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            Some((format!("§{}", number.as_str()), whole.start(), whole.end()))
        })
        .collect();

    for (i, (id, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers
            .get(i + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        segment_body(&mut provisions, id, &text[*body_start..body_end]);
    }

    tracing::debug!(
        "Segmented statute into {} provisions from {} section markers",
        provisions.len(),
        markers.len()
    );

    provisions
}

fn segment_body(provisions: &mut ProvisionMap, id: &str, body: &str) {
    let subparagraphs: Vec<(&str, usize, usize)> = SUBPARAGRAPH_MARKER
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            Some((number.as_str(), whole.start(), whole.end()))
        })
        .collect();

    if subparagraphs.is_empty() {
        insert(provisions, id.to_string(), body.trim());
        return;
    }

    for (j, (number, _, text_start)) in subparagraphs.iter().enumerate() {
        let text_end = subparagraphs
            .get(j + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(body.len());
        insert(
            provisions,
            format!("{}, ods. {}", id, number),
            body[*text_start..text_end].trim(),
        );
    }
}

fn insert(provisions: &mut ProvisionMap, id: String, text: &str) {
    if provisions.contains(&id) {
        tracing::debug!("Provision {} appears again, keeping the later text", id);
    }
    provisions.insert(id, text.to_string());
}

/// 將對照表重新組回法規文字，款依原順序編回所屬段落下
pub fn render(provisions: &ProvisionMap) -> String {
    let mut out = String::new();
    let mut current_section: Option<&str> = None;

    for provision in provisions.iter() {
        match provision.id.split_once(", ods. ") {
            Some((section, number)) => {
                if current_section != Some(section) {
                    out.push_str(section);
                    out.push('\n');
                    current_section = Some(section);
                }
                out.push_str(&format!("{}. {}\n", number, provision.text));
            }
            None => {
                current_section = None;
                out.push_str(&format!("{}\n{}\n", provision.id, provision.text));
            }
        }
    }

    out
}
