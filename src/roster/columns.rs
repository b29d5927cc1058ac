//! Header clean-up and fuzzy detection of the class / number / name columns

use unicode_normalization::UnicodeNormalization;

use crate::config::Config;

/// NFC-normalise text so Hangul from NFD file systems compares equal
pub fn normalize_text(s: &str) -> String {
    s.nfc().collect()
}

/// Find the column matching one of `candidates`.
///
/// Exact case-insensitive matches win over substring matches; within each
/// pass candidates are tried in order.
pub fn find_col<S: AsRef<str>>(columns: &[S], candidates: &[String]) -> Option<usize> {
    let lowered: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();

    for cand in candidates {
        let cand = cand.to_lowercase();
        if let Some(i) = lowered.iter().position(|c| *c == cand) {
            return Some(i);
        }
    }

    for cand in candidates {
        let cand = cand.to_lowercase();
        if let Some(i) = lowered.iter().position(|c| c.contains(&cand)) {
            return Some(i);
        }
    }

    None
}

/// Positions of the columns that identify a student
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityColumns {
    pub class: Option<usize>,
    pub number: Option<usize>,
    pub name: Option<usize>,
}

impl IdentityColumns {
    pub fn detect<S: AsRef<str>>(columns: &[S], config: &Config) -> Self {
        Self {
            class: find_col(columns, &config.class_candidates),
            number: find_col(columns, &config.number_candidates),
            name: find_col(columns, &config.name_candidates),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        [self.class, self.number, self.name].contains(&Some(index))
    }

    /// Detected columns in class, number, name order, without repeats
    pub fn ordered(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(3);
        for idx in [self.class, self.number, self.name].into_iter().flatten() {
            if !out.contains(&idx) {
                out.push(idx);
            }
        }
        out
    }
}

/// Clean raw header cells: trim, NFC, name blanks `Unnamed: {i}`, suffix repeats `.1`, `.2`
pub fn clean_headers(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());

    for (i, header) in raw.iter().enumerate() {
        let base = normalize_text(header.trim());
        let base = if base.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            base
        };

        let mut name = base.clone();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        out.push(name);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_beats_substring() {
        let columns = ["학생번호", "번호", "이름"];
        assert_eq!(find_col(&columns, &cands(&["번호", "번", "No"])), Some(1));
    }

    #[test]
    fn test_candidate_order_in_substring_pass() {
        let columns = ["학급명", "반 담임"];
        // "반" is tried before "학급"
        assert_eq!(find_col(&columns, &cands(&["반", "학급"])), Some(1));
    }

    #[test]
    fn test_case_insensitive() {
        let columns = ["CLASS", "student name"];
        assert_eq!(find_col(&columns, &cands(&["Class"])), Some(0));
        assert_eq!(find_col(&columns, &cands(&["Name"])), Some(1));
        assert_eq!(find_col(&columns, &cands(&["No"])), None);
    }

    #[test]
    fn test_identity_columns() {
        let config = Config::default();
        let columns = ["반", "번호", "이름", "국어", "수학"];
        let ids = IdentityColumns::detect(&columns, &config);

        assert_eq!(ids.ordered(), vec![0, 1, 2]);
        assert!(ids.contains(2));
        assert!(!ids.contains(3));
    }

    #[test]
    fn test_clean_headers() {
        let raw = cands(&[" 반 ", "", "국어", "국어", "국어"]);
        assert_eq!(
            clean_headers(&raw),
            vec!["반", "Unnamed: 1", "국어", "국어.1", "국어.2"]
        );
    }

    #[test]
    fn test_nfc() {
        // "한" decomposed into jamo
        let nfd = "\u{1112}\u{1161}\u{11AB}";
        assert_eq!(normalize_text(nfd), "한");
    }
}
