use crate::core::classifier::classify_reply;
use crate::domain::model::{ComparisonResult, Provision, ProvisionMap};
use crate::domain::ports::{ModelClient, ProgressObserver};

/// 參與比對的段落前綴白名單
#[derive(Debug, Clone)]
pub struct ProvisionFilter {
    prefixes: Vec<String>,
}

impl ProvisionFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// 純字串前綴比對：`§5` 也會包含 `§5a` 與 `§50`
    pub fn matches(&self, provision_id: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| provision_id.starts_with(prefix.as_str()))
    }

    pub fn select<'a>(&'a self, provisions: &'a ProvisionMap) -> impl Iterator<Item = &'a Provision> {
        provisions.iter().filter(move |p| self.matches(&p.id))
    }
}

pub struct ComparisonDriver<'a, M: ModelClient + ?Sized> {
    client: &'a M,
    filter: &'a ProvisionFilter,
}

impl<'a, M: ModelClient + ?Sized> ComparisonDriver<'a, M> {
    pub fn new(client: &'a M, filter: &'a ProvisionFilter) -> Self {
        Self { client, filter }
    }

    /// 依序對每個入選法條與每個條款呼叫模型。單次呼叫失敗只會產生一筆不符合的結果，不會中斷。
    pub async fn compare<O: ProgressObserver + ?Sized>(
        &self,
        provisions: &ProvisionMap,
        clauses: &[String],
        observer: &mut O,
    ) -> Vec<ComparisonResult> {
        let mut results = Vec::new();

        for provision in self.filter.select(provisions) {
            for (index, clause) in clauses.iter().enumerate() {
                observer.on_pair_start(&provision.id, index + 1, clauses.len());
                tracing::debug!(
                    "Comparing {} with clause {}/{}",
                    provision.id,
                    index + 1,
                    clauses.len()
                );

                let reply = self.client.complete(&provision.text, clause).await;
                if let Err(e) = &reply {
                    tracing::warn!("⚠️ Model call failed for {}: {}", provision.id, e);
                }
                let verdict = classify_reply(reply);

                let result = ComparisonResult {
                    provision_id: provision.id.clone(),
                    clause: clause.clone(),
                    explanation: verdict.explanation,
                    compliant: verdict.compliant,
                };
                observer.on_pair_done(&result);
                results.push(result);
            }
        }

        observer.on_finished(results.len());
        results
    }
}
