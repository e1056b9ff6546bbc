use crate::domain::model::Verdict;
use crate::utils::error::ModelError;

/// 否定答案的關鍵字（斯洛伐克語「不」）
pub const NEGATIVE_KEYWORD: &str = "nie";

/// 回覆文字中任何位置出現（不分大小寫）否定關鍵字即判定為不符合。
/// 採子字串比對，因此 "stanie" 之類的字也會觸發。
pub fn is_compliant(answer: &str) -> bool {
    !answer.to_lowercase().contains(NEGATIVE_KEYWORD)
}

pub fn classify(answer: &str) -> Verdict {
    Verdict {
        compliant: is_compliant(answer),
        explanation: answer.trim().to_string(),
    }
}

/// 模型呼叫失敗一律視為不符合，說明中帶出錯誤原因
pub fn classify_reply(reply: Result<String, ModelError>) -> Verdict {
    match reply {
        Ok(answer) => classify(&answer),
        Err(e) => Verdict {
            compliant: false,
            explanation: format!("error calling model: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_answer() {
        assert!(!classify("NIE, pretože klauzula odporuje § 5.").compliant);
    }

    #[test]
    fn test_affirmative_answer() {
        let verdict = classify("  ÁNO, klauzula je v súlade  ");
        assert!(verdict.compliant);
        assert_eq!(verdict.explanation, "ÁNO, klauzula je v súlade");
    }

    #[test]
    fn test_keyword_inside_unrelated_word_still_counts() {
        assert!(!is_compliant("Áno, nič sa nestanie."));
        assert!(!is_compliant("Áno, ak sa to stanie"));
    }

    #[test]
    fn test_failed_reply_is_non_compliant() {
        let verdict = classify_reply(Err(ModelError::Network("connection refused".to_string())));
        assert!(!verdict.compliant);
        assert_eq!(
            verdict.explanation,
            "error calling model: network error: connection refused"
        );
    }
}
