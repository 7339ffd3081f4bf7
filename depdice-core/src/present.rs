use crate::console;
use crate::manager::{PackageCredits, Person};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const UNKNOWN_AUTHOR: &str = "Who even wrote this???";
pub const NO_LICENSE: &str = "None!?";
pub const UNKNOWN_AGE: &str = "unknown";

const FAMOUS_AUTHOR: &str = "Sindre Sorhus";
const FAMOUS_AUTHOR_NOTE: &str = "<== It's you-know-who again!";
const REBEL_LICENSE_NOTE: &str = "<== Oooh, rebel!";
const OLD_PACKAGE_NOTE: &str = "<== Pretty darn old in JS years!";
const COMMON_LICENSES: [&str; 2] = ["MIT", "ISC"];

const DAY_MS: i128 = 24 * 60 * 60 * 1000;
const YEAR_DAYS: i64 = 365;
/// Three and a half years.
const OLD_AFTER_DAYS: i64 = 1277;

pub fn authors(credits: &PackageCredits) -> String {
    if let Some(author) = credits.author.as_ref().map(Person::to_string)
        && !author.trim().is_empty()
    {
        let output = strip_parenthesized(&author);
        if output.contains(FAMOUS_AUTHOR) {
            return format!("{}  {}", output, console::yellow(FAMOUS_AUTHOR_NOTE));
        }
        return output;
    }

    if !credits.contributors.is_empty() {
        return join_people(&credits.contributors);
    }

    if !credits.maintainers.is_empty() {
        return join_people(&credits.maintainers);
    }

    console::red_bold(UNKNOWN_AUTHOR)
}

pub fn license(credits: &PackageCredits) -> String {
    if !credits.licenses.is_empty() {
        return credits
            .licenses
            .iter()
            .map(|license| license.kind().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ");
    }

    let Some(license) = credits.license.as_ref().and_then(|l| l.kind()) else {
        return console::red_bold(NO_LICENSE);
    };

    if license.is_empty() {
        return console::red_bold(NO_LICENSE);
    }

    if !COMMON_LICENSES.contains(&license) {
        return format!("{}  {}", license, console::yellow(REBEL_LICENSE_NOTE));
    }

    license.to_string()
}

/// Renders how long ago `timestamp` (RFC 3339) was, relative to `now`.
pub fn age(timestamp: &str, now: OffsetDateTime) -> String {
    match OffsetDateTime::parse(timestamp, &Rfc3339) {
        Ok(then) => format_age(days_between(then, now)),
        Err(_) => UNKNOWN_AGE.to_string(),
    }
}

pub fn age_from_now(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(timestamp) => age(timestamp, OffsetDateTime::now_utc()),
        None => UNKNOWN_AGE.to_string(),
    }
}

/// Whole days from `then` to `now`, rounded up; never negative.
pub fn days_between(then: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let ms = (now - then).whole_milliseconds();
    let days = (ms + DAY_MS - 1).div_euclid(DAY_MS);
    days.max(0) as i64
}

pub fn format_age(days: i64) -> String {
    if days < YEAR_DAYS {
        return format!("{} days", days);
    }

    let years = days / YEAR_DAYS;
    let rest = days % YEAR_DAYS;

    if days > OLD_AFTER_DAYS {
        return format!(
            "{} years, {} days  {}",
            years,
            rest,
            console::red_bold(OLD_PACKAGE_NOTE)
        );
    }

    format!("{} years, {} days", years, rest)
}

fn join_people(people: &[Person]) -> String {
    people
        .iter()
        .map(Person::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drops the first non-empty `(...)` group and the spaces before it, e.g. an
/// author URL.
fn strip_parenthesized(text: &str) -> String {
    let mut from = 0;

    while let Some(found) = text[from..].find('(') {
        let open = from + found;
        let Some(len) = text[open + 1..].find(')') else {
            break;
        };

        if len == 0 {
            from = open + 1;
            continue;
        }

        let start = text[..open].trim_end_matches(' ').len();
        let end = open + 1 + len + 1;
        return format!("{}{}", &text[..start], &text[end..]);
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::License;
    use serde_json::json;
    use time::Duration;

    fn credits(value: serde_json::Value) -> PackageCredits {
        serde_json::from_value(value).unwrap()
    }

    fn ago(now: OffsetDateTime, days: i64) -> String {
        (now - Duration::days(days)).format(&Rfc3339).unwrap()
    }

    #[test]
    fn author_string_drops_url() {
        let c = credits(json!({ "author": "TJ Holowaychuk <tj@vision-media.ca> (http://tjholowaychuk.com)" }));
        assert_eq!(authors(&c), "TJ Holowaychuk <tj@vision-media.ca>");
    }

    #[test]
    fn famous_author_gets_a_note() {
        let c = credits(json!({ "author": "Sindre Sorhus <sindresorhus@gmail.com> (https://sindresorhus.com)" }));
        let out = authors(&c);
        assert!(out.starts_with("Sindre Sorhus <sindresorhus@gmail.com>"));
        assert!(out.contains(FAMOUS_AUTHOR_NOTE));
    }

    #[test]
    fn blank_author_falls_back_to_contributors_then_maintainers() {
        let c = credits(json!({ "author": "  ", "contributors": ["a", "b"], "maintainers": ["m"] }));
        assert_eq!(authors(&c), "a, b");

        let c = credits(json!({ "maintainers": ["m1 <m1@x.io>", "m2"] }));
        assert_eq!(authors(&c), "m1 <m1@x.io>, m2");
    }

    #[test]
    fn no_author_is_flagged() {
        assert!(authors(&credits(json!({}))).contains(UNKNOWN_AUTHOR));
    }

    #[test]
    fn common_licenses_pass_through() {
        assert_eq!(license(&credits(json!({ "license": "MIT" }))), "MIT");
        assert_eq!(license(&credits(json!({ "license": "ISC" }))), "ISC");
    }

    #[test]
    fn uncommon_license_is_annotated() {
        let out = license(&credits(json!({ "license": "GPL-3.0" })));
        assert!(out.contains("GPL-3.0"));
        assert!(out.contains(REBEL_LICENSE_NOTE));
    }

    #[test]
    fn licenses_list_wins() {
        let c = PackageCredits {
            license: Some(License::Text("WTFPL".into())),
            licenses: vec![
                License::Detailed {
                    kind: Some("MIT".into()),
                    url: None,
                },
                License::Text("Apache-2.0".into()),
            ],
            ..PackageCredits::default()
        };
        assert_eq!(license(&c), "MIT, Apache-2.0");
    }

    #[test]
    fn missing_license_is_flagged() {
        assert!(license(&credits(json!({}))).contains(NO_LICENSE));
        assert!(license(&credits(json!({ "license": "" }))).contains(NO_LICENSE));
    }

    #[test]
    fn formats_ages() {
        let now = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();

        assert_eq!(age(&ago(now, 10), now), "10 days");
        assert_eq!(age(&ago(now, 400), now), "1 years, 35 days");

        let three = age(&ago(now, 1200), now);
        assert!(three.starts_with("3 years, 105 days"));
        assert!(!three.contains(OLD_PACKAGE_NOTE));

        let older = age(&ago(now, 1300), now);
        assert!(older.starts_with("3 years, 205 days"));
        assert!(older.contains(OLD_PACKAGE_NOTE));
    }

    #[test]
    fn partial_days_round_up() {
        let now = OffsetDateTime::now_utc();
        let then = now - Duration::hours(30);
        assert_eq!(days_between(then, now), 2);
        assert_eq!(days_between(now + Duration::hours(5), now), 0);
    }

    #[test]
    fn bad_timestamps_are_unknown() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(age("last tuesday", now), UNKNOWN_AGE);
        assert_eq!(age_from_now(None), UNKNOWN_AGE);
    }

    #[test]
    fn strips_only_first_group() {
        assert_eq!(strip_parenthesized("a (x) b (y)"), "a b (y)");
        assert_eq!(strip_parenthesized("a ()"), "a ()");
        assert_eq!(
            strip_parenthesized("Jane () (https://jane.dev)"),
            "Jane ()"
        );
        assert_eq!(strip_parenthesized("no parens"), "no parens");
    }
}
