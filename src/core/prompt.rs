pub const DEFAULT_PERSONA: &str = "Si právny expert na kolektívne investovanie.";

/// 組出要求模型判斷條款是否符合法條的提示詞
pub fn build_prompt(persona: &str, provision: &str, clause: &str) -> String {
    format!(
        r#"{persona}
Porovnaj nasledujúcu zmluvnú klauzulu so zákonným ustanovením (odpovedaj ano alebo nie, ak nie doplň dôvod).

Zákonné ustanovenie:
"""{provision}"""

Zmluvná klauzula:
"""{clause}"""

Otázka:
Je zmluvná klauzula v súlade so zákonom? Odpovedz ÁNO alebo NIE a vysvetli prečo.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_both_texts() {
        let prompt = build_prompt(DEFAULT_PERSONA, "Fond musí mať depozitára.", "Depozitárom je banka X.");

        assert!(prompt.starts_with(DEFAULT_PERSONA));
        assert!(prompt.contains("\"\"\"Fond musí mať depozitára.\"\"\""));
        assert!(prompt.contains("\"\"\"Depozitárom je banka X.\"\"\""));
        assert!(prompt.contains("Odpovedz ÁNO alebo NIE"));
    }
}
