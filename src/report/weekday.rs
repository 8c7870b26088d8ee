use chrono::{Datelike, NaiveDate};

// abbreviation tables indexed by days-from-Sunday, per agency language
const ABBREV_EN: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const ABBREV_ES: [&str; 7] = ["DOM", "LUN", "MAR", "MIÉ", "JUE", "VIE", "SÁB"];
const ABBREV_PT: [&str; 7] = ["DOM", "SEG", "TER", "QUA", "QUI", "SEX", "SÁB"];
const ABBREV_FR: [&str; 7] = ["DIM", "LUN", "MAR", "MER", "JEU", "VEN", "SAM"];
const ABBREV_DEFAULT: [&str; 7] = ["1", "2", "3", "4", "5", "6", "7"];

/// weekday abbreviation table for an agency language tag ("en", "en-US", ..).
/// unknown languages fall back to numeric day labels.
pub fn weekday_abbrevs(lang: Option<&str>) -> &'static [&'static str; 7] {
    let code = lang.and_then(|l| l.get(..2)).unwrap_or_default();
    match code.to_ascii_lowercase().as_str() {
        "en" => &ABBREV_EN,
        "es" => &ABBREV_ES,
        "pt" => &ABBREV_PT,
        "fr" => &ABBREV_FR,
        _ => &ABBREV_DEFAULT,
    }
}

/// abbreviation for the weekday of a concrete date.
pub fn abbrev(lang: Option<&str>, date: NaiveDate) -> &'static str {
    weekday_abbrevs(lang)[date.weekday().num_days_from_sunday() as usize]
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::{abbrev, weekday_abbrevs};

    #[test]
    fn test_abbrev_follows_the_dates_weekday() {
        // 2024-03-04 is a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid test date");
        assert_eq!(abbrev(Some("en"), monday), "MON");
        assert_eq!(abbrev(Some("fr"), monday), "LUN");
    }

    #[test]
    fn test_region_suffix_and_fallback() {
        assert_eq!(weekday_abbrevs(Some("en-US"))[0], "SUN");
        assert_eq!(weekday_abbrevs(Some("de"))[0], "1");
        assert_eq!(weekday_abbrevs(None)[6], "7");
    }
}
