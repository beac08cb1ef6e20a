use blog_backend::{
    entities::dashboard::ArticleStamp,
    use_cases::dashboard::{activity_buckets, day_window_start, month_buckets, month_window_start},
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn stamp(at: DateTime<Utc>, is_draft: bool) -> ArticleStamp {
    ArticleStamp { created_at: at, is_draft }
}

#[test]
fn histogram_spans_twelve_months_ending_now() {
    let now = utc(2025, 3, 10);
    let stamps = vec![
        stamp(utc(2025, 1, 5), false),
        stamp(utc(2025, 1, 20), false),
        stamp(utc(2025, 1, 28), true),
        stamp(utc(2025, 3, 1), false),
        stamp(utc(2025, 3, 2), false),
        stamp(utc(2025, 3, 3), true),
        stamp(utc(2025, 3, 4), true),
        stamp(utc(2025, 3, 9), false),
        stamp(utc(2024, 1, 9), false),
    ];

    let buckets = month_buckets(&now, &stamps);

    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets.first().unwrap().month, "2024-04");
    assert_eq!(buckets.last().unwrap().month, "2025-03");

    let count = |month: &str| buckets.iter().find(|b| b.month == month).unwrap().count;
    assert_eq!(count("2025-01"), 3);
    assert_eq!(count("2025-02"), 0);
    assert_eq!(count("2025-03"), 5);

    let march = buckets.last().unwrap();
    assert_eq!(march.published_count + march.draft_count, march.count);
    assert_eq!(march.draft_count, 2);

    let total: u32 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, 8);
}

#[test]
fn activity_trend_is_seven_ascending_days() {
    let now = utc(2025, 3, 3);
    let trend = activity_buckets(
        &now,
        &[utc(2025, 3, 3), utc(2025, 2, 27), utc(2025, 2, 20)],
        &[utc(2025, 3, 1)],
        &[],
    );

    let dates: Vec<&str> = trend.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(
        dates,
        ["2025-02-25", "2025-02-26", "2025-02-27", "2025-02-28", "2025-03-01", "2025-03-02", "2025-03-03"]
    );
    assert_eq!(trend[6].articles_created, 1);
    assert_eq!(trend[2].articles_created, 1);
    assert_eq!(trend[4].projects_created, 1);
    assert!(trend.iter().all(|d| d.slides_created == 0));
}

#[test]
fn buckets_follow_the_callers_time_zone() {
    let tz = FixedOffset::east_opt(8 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
    // 2025-03-31T20:00Z is already April 1st at UTC+8.
    let stamps = vec![stamp(Utc.with_ymd_and_hms(2025, 3, 31, 20, 0, 0).unwrap(), false)];

    let buckets = month_buckets(&now, &stamps);
    assert_eq!(buckets.last().unwrap().month, "2025-04");
    assert_eq!(buckets.last().unwrap().count, 1);
}

#[test]
fn fetch_windows_cover_the_first_bucket() {
    let now = utc(2025, 3, 10);

    assert!(month_window_start(&now) <= Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
    assert!(day_window_start(&now) <= Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());
}
