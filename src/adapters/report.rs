use crate::domain::model::ComparisonResult;
use crate::domain::ports::{ProgressObserver, Storage};
use crate::utils::error::Result;
use std::io::Write;

/// 將比對結果寫成 JSON 陣列（縮排兩格、保留非 ASCII 字元）
pub async fn save_results<S: Storage>(
    storage: &S,
    results: &[ComparisonResult],
    path: &str,
) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    tracing::debug!("Writing {} results ({} bytes) to {}", results.len(), json.len(), path);
    storage.write_file(path, json.as_bytes()).await
}

pub async fn save_tsv<S: Storage>(
    storage: &S,
    results: &[ComparisonResult],
    path: &str,
) -> Result<()> {
    let data = to_tsv(results)?;
    storage.write_file(path, &data).await
}

pub fn to_tsv(results: &[ComparisonResult]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    for result in results {
        writer.serialize(result)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// 從 JSON 輸出路徑推出 TSV 路徑
pub fn tsv_path(json_path: &str) -> String {
    match json_path.strip_suffix(".json") {
        Some(stem) => format!("{}.tsv", stem),
        None => format!("{}.tsv", json_path),
    }
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn print_summary<W: Write>(results: &[ComparisonResult], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Provision\tClause\tCompliant\tExplanation")?;
    for r in results {
        writeln!(
            out,
            "{}\t{}...\t{}\t{}",
            r.provision_id,
            truncate_chars(&r.clause, 40),
            r.compliant,
            r.explanation
        )?;
    }
    Ok(())
}

/// 批次模式的逐筆進度輸出；寫入失敗只警告一次，不中斷比對
pub struct ConsoleProgress<W: Write> {
    out: W,
    write_failed: bool,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            write_failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn emit(&mut self, args: std::fmt::Arguments) {
        if self.write_failed {
            return;
        }
        if let Err(e) = self.out.write_fmt(args) {
            tracing::warn!("⚠️ Progress output failed, continuing without it: {}", e);
            self.write_failed = true;
        }
    }
}

impl<W: Write> ProgressObserver for ConsoleProgress<W> {
    fn on_pair_start(&mut self, provision_id: &str, clause_index: usize, clause_total: usize) {
        self.emit(format_args!(
            "\nComparing: {} vs. clause {}/{}\n",
            provision_id, clause_index, clause_total
        ));
    }

    fn on_pair_done(&mut self, result: &ComparisonResult) {
        let verdict = if result.compliant {
            "COMPLIANT"
        } else {
            "NON-COMPLIANT"
        };
        self.emit(format_args!(
            "Result: {}\nModel answer: {}\n",
            verdict, result.explanation
        ));
    }

    fn on_finished(&mut self, total: usize) {
        self.emit(format_args!("\nComparison finished ({} pairs).\n\n", total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(provision_id: &str, clause: &str, compliant: bool) -> ComparisonResult {
        ComparisonResult {
            provision_id: provision_id.to_string(),
            clause: clause.to_string(),
            explanation: if compliant { "ÁNO" } else { "NIE" }.to_string(),
            compliant,
        }
    }

    #[test]
    fn test_summary_truncates_clause_to_40_chars() {
        let long = "Štatút fondu upravuje práva a povinnosti podielnikov a správcu.";
        let mut out = Vec::new();
        print_summary(&[result("§3", long, true)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Provision\tClause\tCompliant\tExplanation"));
        let row = lines.next().unwrap();
        let expected_clause: String = long.chars().take(40).collect();
        assert_eq!(row, format!("§3\t{}...\ttrue\tÁNO", expected_clause));
    }

    #[test]
    fn test_tsv_has_header_and_rows() {
        let data = to_tsv(&[result("§5, ods. 1", "a", false)]).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(
            text,
            "zakon\tcast_zmluvy\tvysvetlenie\tsulad\n§5, ods. 1\ta\tNIE\tfalse\n"
        );
    }

    #[test]
    fn test_tsv_path() {
        assert_eq!(tsv_path("vysledky.json"), "vysledky.tsv");
        assert_eq!(tsv_path("out/results"), "out/results.tsv");
    }

    #[test]
    fn test_console_progress_lines() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.on_pair_start("§3", 1, 2);
        progress.on_pair_done(&result("§3", "a", false));
        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert!(text.contains("Comparing: §3 vs. clause 1/2"));
        assert!(text.contains("Result: NON-COMPLIANT"));
    }

    struct ClosedPipe {
        attempts: usize,
    }

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.attempts += 1;
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_progress_survives_broken_output() {
        let mut progress = ConsoleProgress::new(ClosedPipe { attempts: 0 });
        progress.on_pair_start("§3", 1, 2);
        progress.on_pair_done(&result("§3", "a", true));
        progress.on_finished(1);

        assert!(progress.write_failed());
        // 第一次失敗後不再嘗試寫入
        assert_eq!(progress.into_inner().attempts, 1);
    }
}
