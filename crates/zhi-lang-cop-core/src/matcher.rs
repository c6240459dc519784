//! Term matching engine.
//!
//! Terms are tried longest first (ties in lexicographic order). Each term is
//! located with a plain substring search, so a term also matches inside a
//! longer unrelated word. An occurrence that shares any offset with a span
//! already claimed by an earlier term is dropped; otherwise it claims its
//! span and yields one [`Issue`] per mapping that passes the severity filter.
//! The span is claimed even when every mapping is filtered out.
//!
//! After an occurrence at `start` the search resumes at `start + 1` char, not
//! at the end of the match, so overlapping occurrences of the same term are
//! each attempted.
//!
//! Overlap checks walk a flat list of claimed spans, which is linear in the
//! number of matches so far. For large dictionaries the per-term search is
//! the natural place to swap in a multi-pattern automaton (Aho-Corasick)
//! while keeping the overlap, ordering and filtering rules unchanged.

use std::cmp::Reverse;
use std::ops::Range;

use crate::dictionary::TermDictionary;
use crate::types::{Issue, Level, Location, Position};

/// Scans text against a borrowed dictionary.
///
/// Holds no per-scan state; one matcher can serve any number of scans.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'d> {
    dict: &'d TermDictionary,
    min_level: Option<Level>,
}

impl<'d> Matcher<'d> {
    /// Create a matcher. `min_level = None` reports every level.
    pub const fn new(dict: &'d TermDictionary, min_level: Option<Level>) -> Self {
        Self { dict, min_level }
    }

    /// Find every flagged term in `text`, ordered by start position.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), min_level = ?self.min_level))]
    pub fn find_matches(&self, text: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        if text.is_empty() {
            return issues;
        }

        let mut claimed: Vec<Range<usize>> = Vec::new();

        for term in scan_order(self.dict) {
            let mut from = 0;
            while let Some(found) = text[from..].find(term) {
                let start = from + found;
                let span = start..start + term.len();

                if !claimed.iter().any(|c| overlaps(c, &span)) {
                    let location = Location {
                        start: position_at(text, span.start),
                        end: position_at(text, span.end),
                    };
                    for mapping in self.dict.mappings_for_term(term) {
                        let Some(rule) = self.dict.rule_by_id(&mapping.rule_id) else {
                            continue;
                        };
                        if !self.includes(rule.level) {
                            continue;
                        }
                        issues.push(Issue {
                            rule_id: mapping.rule_id.clone(),
                            level: rule.level,
                            term: term.to_string(),
                            message: rule.message.clone(),
                            alternatives: mapping.alternatives.clone(),
                            location,
                        });
                    }
                    claimed.push(span);
                }

                from = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }

        // Stable: issues at the same position keep mapping order.
        issues.sort_by_key(|issue| issue.location.start);

        tracing::debug!(
            issues = issues.len(),
            claimed = claimed.len(),
            "scan complete"
        );
        issues
    }

    fn includes(&self, level: Level) -> bool {
        self.min_level.is_none_or(|min| level.meets(min))
    }
}

/// Scan `text` with a one-off matcher.
pub fn scan(dict: &TermDictionary, text: &str, min_level: Option<Level>) -> Vec<Issue> {
    Matcher::new(dict, min_level).find_matches(text)
}

/// Terms sorted by descending char length, then lexicographically.
fn scan_order(dict: &TermDictionary) -> Vec<&str> {
    let mut terms: Vec<&str> = dict.all_terms().collect();
    terms.sort_by_cached_key(|t| (Reverse(t.chars().count()), *t));
    terms
}

/// Half-open spans overlap when they share at least one offset.
const fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Map a byte offset in `text` to a 1-based line and char column.
fn position_at(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position {
        line: 1 + before.bytes().filter(|&b| b == b'\n').count(),
        column: 1 + before[line_start..].chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::TermsDatabase;
    use crate::types::{Category, Rule, TermMapping};

    /// Build a dictionary from `(term, rule_id, level, alternatives)` rows.
    fn dict(rows: &[(&str, &str, Level, &[&str])]) -> TermDictionary {
        let mut db = TermsDatabase {
            version: "test".to_string(),
            last_updated: "2025-01-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        for &(term, rule_id, level, alts) in rows {
            db.rules.entry(rule_id.to_string()).or_insert_with(|| Rule {
                level,
                message: format!("rule {rule_id}"),
                category: Category::General,
                concepts: Vec::new(),
            });
            db.term_to_rules_map
                .entry(term.to_string())
                .or_default()
                .push(TermMapping {
                    rule_id: rule_id.to_string(),
                    alternatives: alts.iter().map(|s| (*s).to_string()).collect(),
                });
        }
        TermDictionary::new(db).unwrap()
    }

    fn pos(line: usize, column: usize) -> Position {
        Position { line, column }
    }

    /// Convert a position back to a char offset in `text`.
    fn char_offset(text: &str, p: Position) -> usize {
        let preceding: usize = text
            .split('\n')
            .take(p.line - 1)
            .map(|l| l.chars().count() + 1)
            .sum();
        preceding + p.column - 1
    }

    fn terms(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.term.as_str()).collect()
    }

    #[test]
    fn empty_text_yields_nothing() {
        let d = dict(&[("優化", "10000", Level::Error, &["最佳化"])]);
        for level in Level::ALL {
            assert!(scan(&d, "", Some(level)).is_empty());
        }
        assert!(scan(&d, "", None).is_empty());
    }

    #[test]
    fn scenario_error_threshold() {
        let d = dict(&[
            ("優化", "10000", Level::Error, &["最佳化"]),
            ("視頻", "00001", Level::Hazard, &["影片"]),
        ]);
        let text = "我需要優化數據庫的性能";
        let issues = scan(&d, text, Some(Level::Error));

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.term, "優化");
        assert_eq!(issue.rule_id, "10000");
        assert_eq!(issue.level, Level::Error);
        assert_eq!(issue.alternatives, ["最佳化"]);
        assert_eq!(issue.message, "rule 10000");
        assert_eq!(issue.location.start, pos(1, 4));
        assert_eq!(issue.location.end, pos(1, 6));
    }

    #[test]
    fn position_on_later_line() {
        let d = dict(&[("優化", "10000", Level::Error, &["最佳化"])]);
        let issues = scan(&d, "第一行\n第二行有優化\n第三行", None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.start, pos(2, 5));
        assert_eq!(issues[0].location.end, pos(2, 7));
    }

    #[test]
    fn end_position_may_sit_at_line_end() {
        let d = dict(&[("視頻", "00001", Level::Hazard, &["影片"])]);
        let issues = scan(&d, "看視頻\n", None);
        assert_eq!(issues[0].location.end, pos(1, 4));
    }

    #[test]
    fn longest_term_wins() {
        let d = dict(&[
            ("數據", "20000", Level::Warning, &["資料"]),
            ("數據庫", "10001", Level::Error, &["資料庫"]),
        ]);
        let issues = scan(&d, "數據庫和數據", None);
        assert_eq!(terms(&issues), ["數據庫", "數據"]);
        assert_eq!(issues[0].rule_id, "10001");
        assert_eq!(issues[1].location.start, pos(1, 5));
    }

    #[test]
    fn filtered_long_term_still_claims_its_span() {
        let d = dict(&[
            ("程序", "00009", Level::Hazard, &["程式"]),
            ("程序員", "30009", Level::Info, &["程式設計師"]),
        ]);
        assert!(scan(&d, "程序員", Some(Level::Hazard)).is_empty());
        assert_eq!(terms(&scan(&d, "程序員", None)), ["程序員"]);
    }

    #[test]
    fn equal_length_ties_break_lexicographically() {
        let d = dict(&[
            ("bc", "2", Level::Error, &["x"]),
            ("ab", "1", Level::Error, &["y"]),
        ]);
        let issues = scan(&d, "abc", None);
        assert_eq!(terms(&issues), ["ab"]);
    }

    #[test]
    fn adjacent_occurrences_do_not_overlap() {
        let d = dict(&[
            ("ab", "1", Level::Error, &[]),
            ("cd", "2", Level::Error, &[]),
        ]);
        assert_eq!(terms(&scan(&d, "abcd", None)), ["ab", "cd"]);
    }

    #[test]
    fn self_overlapping_occurrences_advance_by_one() {
        let d = dict(&[("aa", "1", Level::Error, &[])]);
        let three = scan(&d, "aaa", None);
        assert_eq!(three.len(), 1);
        assert_eq!(three[0].location.start, pos(1, 1));

        let four = scan(&d, "aaaa", None);
        assert_eq!(four.len(), 2);
        assert_eq!(four[1].location.start, pos(1, 3));
    }

    #[test]
    fn matches_inside_larger_words() {
        let d = dict(&[("信息", "10005", Level::Error, &["資訊"])]);
        assert_eq!(scan(&d, "通信息息相關", None).len(), 1);
    }

    #[test]
    fn one_issue_per_mapping_in_dictionary_order() {
        let d = dict(&[
            ("程序", "20002", Level::Warning, &["程式"]),
            ("程序", "40002", Level::Depends, &["流程", "步驟"]),
        ]);
        let issues = scan(&d, "開發程序", None);
        let ids: Vec<&str> = issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(ids, ["20002", "40002"]);
        assert_eq!(issues[0].location, issues[1].location);

        let warnings_only = scan(&d, "開發程序", Some(Level::Warning));
        assert_eq!(warnings_only.len(), 1);
        assert_eq!(warnings_only[0].rule_id, "20002");
    }

    #[test]
    fn issues_sorted_by_line_then_column() {
        let d = dict(&[
            ("軟件", "10002", Level::Error, &["軟體"]),
            ("網絡", "10004", Level::Error, &["網路"]),
            ("視頻", "00001", Level::Hazard, &["影片"]),
        ]);
        let text = "網絡視頻\n軟件與網絡";
        let issues = scan(&d, text, None);
        let starts: Vec<Position> = issues.iter().map(|i| i.location.start).collect();
        assert_eq!(starts, [pos(1, 1), pos(1, 3), pos(2, 1), pos(2, 4)]);
        assert_eq!(terms(&issues), ["網絡", "視頻", "軟件", "網絡"]);
    }

    #[test]
    fn severity_threshold_is_monotonic() {
        let d = dict(&[
            ("視頻", "00001", Level::Hazard, &["影片"]),
            ("優化", "10000", Level::Error, &["最佳化"]),
            ("性能", "20001", Level::Warning, &["效能"]),
            ("打印", "30000", Level::Info, &["列印"]),
            ("項目", "40000", Level::Depends, &["專案"]),
        ]);
        let text = "項目要打印視頻並優化性能";
        let mut previous: Option<Vec<Issue>> = None;
        for level in Level::ALL {
            let current = scan(&d, text, Some(level));
            assert!(current.iter().all(|i| i.level.meets(level)));
            if let Some(stricter) = previous {
                assert!(stricter.iter().all(|i| current.contains(i)));
                assert!(current.len() > stricter.len());
            }
            previous = Some(current);
        }
        assert_eq!(scan(&d, text, None), scan(&d, text, Some(Level::Depends)));
    }

    #[test]
    fn repeated_scans_are_identical() {
        let d = TermDictionary::bundled().unwrap();
        let text = "程序員用軟件優化數據庫\n打開視頻，查看默認網絡信息與項目數據";
        let first = scan(&d, text, None);
        for _ in 0..5 {
            assert_eq!(scan(&d, text, None), first);
        }
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&scan(&d, text, None)).unwrap()
        );
    }

    #[test]
    fn reported_spans_never_overlap() {
        let d = TermDictionary::bundled().unwrap();
        let text = "程序員的程序數據庫數據\n數據庫程序員程序程序";
        let issues = scan(&d, text, None);
        assert!(!issues.is_empty());

        let mut spans: Vec<(usize, usize)> = issues
            .iter()
            .map(|i| {
                (
                    char_offset(text, i.location.start),
                    char_offset(text, i.location.end),
                )
            })
            .collect();
        spans.dedup();
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(a.1 <= b.0 || b.1 <= a.0, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn unknown_terms_never_reported() {
        let d = dict(&[("視頻", "00001", Level::Hazard, &["影片"])]);
        let issues = scan(&d, "這段文字很正常，沒有任何問題", None);
        assert!(issues.is_empty());
    }

    #[test]
    fn alternatives_round_trip_from_dictionary() {
        let d = TermDictionary::bundled().unwrap();
        let issues = scan(&d, "程序員在服務器上調整內存與信息", None);
        assert!(!issues.is_empty());
        for issue in &issues {
            let mapping = d
                .mappings_for_term(&issue.term)
                .iter()
                .find(|m| m.rule_id == issue.rule_id)
                .unwrap();
            assert_eq!(issue.alternatives, mapping.alternatives);
        }
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let d = dict(&[("video", "1", Level::Hazard, &["影片"])]);
        let issues = scan(&d, "看看video", None);
        assert_eq!(issues[0].location.start, pos(1, 3));
        assert_eq!(issues[0].location.end, pos(1, 8));
    }

    #[test]
    fn bundled_dictionary_flags_known_terms() {
        let d = TermDictionary::bundled().unwrap();
        let issues = scan(&d, "我需要優化數據庫的性能", None);
        assert!(issues.iter().any(|i| i.term == "優化"));
        assert!(issues.iter().any(|i| i.term == "數據庫"));
        assert!(!issues.iter().any(|i| i.term == "數據"));

        assert!(scan(&d, "優化數據庫", Some(Level::Hazard)).is_empty());

        let hazard = scan(&d, "這是視頻", Some(Level::Error));
        assert_eq!(hazard[0].term, "視頻");
        assert_eq!(hazard[0].level, Level::Hazard);
    }

    #[test]
    fn matcher_is_reusable() {
        let d = dict(&[("優化", "10000", Level::Error, &["最佳化"])]);
        let matcher = Matcher::new(&d, Some(Level::Error));
        assert_eq!(matcher.find_matches("優化").len(), 1);
        assert_eq!(matcher.find_matches("優化優化").len(), 2);
    }
}
