/// Converts a snake-case identifier into a title-case label.
///
/// Underscores become spaces, and every run of letters is capitalized: the
/// first letter upper-case, the rest lower-case. Letters following a digit or
/// punctuation start a new word.
///
/// # Examples
///
/// ```
/// use covistat_analysis::label::format_label;
///
/// assert_eq!(format_label("age_group"), "Age Group");
/// assert_eq!(format_label("infection_status"), "Infection Status");
/// assert_eq!(format_label("sex"), "Sex");
/// ```
#[must_use]
pub fn format_label(identifier: &str) -> String {
    let mut label = String::with_capacity(identifier.len());
    let mut in_word = false;
    for ch in identifier.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if in_word {
                label.extend(ch.to_lowercase());
            } else {
                label.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            label.push(ch);
            in_word = false;
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_identifiers() {
        assert_eq!(format_label("infection_status"), "Infection Status");
        assert_eq!(format_label("age_group"), "Age Group");
        assert_eq!(format_label("nationality"), "Nationality");
    }

    #[test]
    fn test_mixed_case_is_normalized() {
        assert_eq!(format_label("iNFECTION_STATUS"), "Infection Status");
    }

    #[test]
    fn test_non_letters_start_new_words() {
        assert_eq!(format_label("covid19_cases"), "Covid19 Cases");
        assert_eq!(format_label("x2y"), "X2Y");
        assert_eq!(format_label("65+_group"), "65+ Group");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(format_label(""), "");
        assert_eq!(format_label("_"), " ");
        assert_eq!(format_label("a__b"), "A  B");
    }
}
