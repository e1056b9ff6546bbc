use crate::adapters::report::truncate_chars;
use crate::core::engine::{AuditEngine, AuditRun};
use crate::domain::ports::{ConfigProvider, ModelClient, Silent, Storage};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// 終端互動流程：指定合約檔、預覽條款、確認後比對並列出不符合的結果
pub struct InteractiveSession<R: BufRead, W: Write> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> InteractiveSession<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub async fn run<S, M, C>(&mut self, engine: &AuditEngine<S, M, C>) -> Result<AuditRun>
    where
        S: Storage,
        M: ModelClient,
        C: ConfigProvider,
    {
        let mut run = AuditRun::new();

        let contract_path = loop {
            match self.prompt("Contract DOCX path: ")? {
                None => {
                    writeln!(self.out, "Upload a DOCX contract to check.")?;
                    return Ok(run);
                }
                Some(path) if path.is_empty() => continue,
                Some(path) => break path,
            }
        };

        if let Err(e) = engine.load_contract(&mut run, &contract_path).await {
            writeln!(self.out, "❌ {}", e.user_friendly_message())?;
            return Err(e);
        }

        writeln!(self.out, "File loaded successfully!")?;
        writeln!(self.out, "Contract clauses loaded: {}", run.clauses.len())?;
        writeln!(self.out, "Contract preview:")?;
        for (i, clause) in run
            .clauses
            .iter()
            .take(engine.config().preview_count())
            .enumerate()
        {
            writeln!(self.out, "{}. {}", i + 1, clause)?;
        }

        let answer = self
            .prompt("Compare with the statute? [y/N]: ")?
            .unwrap_or_default();
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            writeln!(self.out, "Comparison skipped.")?;
            return Ok(run);
        }

        writeln!(self.out, "Comparing, please wait...")?;
        if let Err(e) = engine
            .load_statute(&mut run, engine.config().statute_path())
            .await
        {
            writeln!(self.out, "❌ {}", e.user_friendly_message())?;
            return Err(e);
        }
        engine.compare(&mut run, &mut Silent).await;

        if let Err(e) = engine.persist(&run).await {
            tracing::warn!("⚠️ Could not save results: {}", e);
        }

        self.report(&run)?;
        Ok(run)
    }

    fn report(&mut self, run: &AuditRun) -> Result<()> {
        let count = run.non_compliant_count();
        writeln!(self.out, "Non-compliant results found: {}", count)?;

        if count == 0 {
            writeln!(
                self.out,
                "According to the model, every contract clause complies with the selected provisions."
            )?;
            return Ok(());
        }

        writeln!(self.out, "Non-compliance table:")?;
        writeln!(self.out, "Provision\tClause\tExplanation")?;
        for r in run.non_compliant() {
            writeln!(
                self.out,
                "{}\t{}...\t{}",
                r.provision_id,
                truncate_chars(&r.clause, 80),
                r.explanation
            )?;
        }
        Ok(())
    }
}
