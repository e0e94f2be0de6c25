// src/common/codes.rs

// Alocação de códigos sequenciais (DEV001, PROJ002, ...).
// Regra: prefixo + zero-pad(maior sufixo numérico existente + 1, 3).
// Sufixos que não são números (ou códigos de outro prefixo) contam como 0.

const CODE_WIDTH: usize = 3;

/// Extrai o sufixo numérico de um código com o prefixo dado.
pub fn numeric_suffix(prefix: &str, code: &str) -> u64 {
    code.strip_prefix(prefix)
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .unwrap_or(0)
}

pub fn next_code<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .map(|code| numeric_suffix(prefix, code))
        .max()
        .unwrap_or(0);

    format!("{prefix}{:0width$}", max.saturating_add(1), width = CODE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn skips_gaps_instead_of_filling_them() {
        assert_eq!(next_code("DEV", ["DEV001", "DEV003"]), "DEV004");
    }

    #[test]
    fn empty_collection_starts_at_one() {
        assert_eq!(next_code("PROJ", std::iter::empty()), "PROJ001");
    }

    #[test]
    fn garbage_suffixes_count_as_zero() {
        assert_eq!(next_code("UNIT", ["UNITabc", "UNIT", "OWN009", "UNIT002"]), "UNIT003");
        assert_eq!(next_code("UNIT", ["UNIT-7", "x"]), "UNIT001");
        assert_eq!(next_code("DEV", ["DEV+5", "DEV 7", "DEV002"]), "DEV003");
    }

    #[test]
    fn grows_past_the_padding_width() {
        assert_eq!(next_code("DEV", ["DEV999"]), "DEV1000");
    }

    proptest! {
        #[test]
        fn new_code_is_unique_and_above_every_suffix(suffixes in proptest::collection::vec(0u64..5000, 0..40)) {
            let codes: Vec<String> = suffixes.iter().map(|n| format!("OWN{n:03}")).collect();
            let next = next_code("OWN", codes.iter().map(String::as_str));

            prop_assert!(!codes.contains(&next));
            let expected = suffixes.iter().copied().max().unwrap_or(0) + 1;
            prop_assert_eq!(numeric_suffix("OWN", &next), expected);
        }
    }
}
