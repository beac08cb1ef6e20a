use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Utc};

use crate::{
    entities::dashboard::{ArticleStamp, DashboardStats, DayBucket, MonthBucket, StatusDistribution},
    errors::AppError,
    repositories::dashboard::DashboardRepository,
};

pub const MONTH_WINDOW: u32 = 12;
pub const DAY_WINDOW: u64 = 7;
const RECENT_ARTICLES: i64 = 10;
const RECENT_OTHERS: i64 = 5;
const TOP_TAGS: i64 = 10;

pub struct DashboardHandler<R>
where
    R: DashboardRepository,
{
    pub dashboard_repo: R,
}

impl<R> DashboardHandler<R>
where
    R: DashboardRepository,
{
    pub fn new(dashboard_repo: R) -> Self {
        DashboardHandler { dashboard_repo }
    }

    /// Stats as seen from the process-local calendar.
    pub async fn compute_stats(&self) -> Result<DashboardStats, AppError> {
        self.compute_stats_at(&Local::now()).await
    }

    pub async fn compute_stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DashboardStats, AppError> {
        let repo = &self.dashboard_repo;

        let (overview, recent_articles, recent_projects, recent_slides, recent_friends, top_tags) =
            futures_util::try_join!(
                repo.overview(),
                repo.recent_articles(RECENT_ARTICLES),
                repo.recent_projects(RECENT_OTHERS),
                repo.recent_slides(RECENT_OTHERS),
                repo.recent_friends(RECENT_OTHERS),
                repo.top_tags(TOP_TAGS),
            )?;

        let (stamps, project_stamps, slide_stamps) = futures_util::try_join!(
            repo.article_stamps_since(month_window_start(now)),
            repo.project_creations_since(day_window_start(now)),
            repo.slide_creations_since(day_window_start(now)),
        )?;

        let article_created: Vec<DateTime<Utc>> = stamps.iter().map(|s| s.created_at).collect();

        Ok(DashboardStats {
            article_status_distribution: StatusDistribution {
                published: overview.published_articles,
                draft: overview.draft_articles,
            },
            overview,
            recent_articles,
            recent_projects,
            recent_slides,
            recent_friends,
            articles_by_month: month_buckets(now, &stamps),
            top_tags,
            recent_activity_trend: activity_buckets(now, &article_created, &project_stamps, &slide_stamps),
        })
    }
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// First day of each month in the window, oldest first.
fn window_months<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<NaiveDate> {
    let current = now.year() * 12 + now.month0() as i32;

    (0..MONTH_WINDOW as i32)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        })
        .collect()
}

fn window_days<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<NaiveDate> {
    let today = now.date_naive();

    (0..DAY_WINDOW)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Lower bound for fetching histogram records. Padded by a day so any offset
/// is covered; records outside the window are discarded while binning.
pub fn month_window_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    padded_start(window_months(now).first().copied(), now)
}

pub fn day_window_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    padded_start(window_days(now).first().copied(), now)
}

fn padded_start<Tz: TimeZone>(first: Option<NaiveDate>, now: &DateTime<Tz>) -> DateTime<Utc> {
    let first = first.unwrap_or_else(|| now.date_naive());
    let midnight = first.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    midnight.checked_sub_days(Days::new(1)).unwrap_or(midnight)
}

/// Rolling twelve-month histogram ending at the month of `now`.
///
/// Every month is present even when empty. Each stamp lands in the bucket of
/// its creation month in `now`'s time zone, or is dropped when older.
pub fn month_buckets<Tz: TimeZone>(now: &DateTime<Tz>, stamps: &[ArticleStamp]) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = window_months(now)
        .into_iter()
        .map(|first| MonthBucket {
            month: month_key(first),
            count: 0,
            published_count: 0,
            draft_count: 0,
        })
        .collect();

    let index: HashMap<String, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.month.clone(), i))
        .collect();

    let tz = now.timezone();
    for stamp in stamps {
        let key = month_key(local_date(&stamp.created_at, &tz));
        if let Some(&i) = index.get(&key) {
            let bucket = &mut buckets[i];
            bucket.count += 1;
            if stamp.is_draft {
                bucket.draft_count += 1;
            } else {
                bucket.published_count += 1;
            }
        }
    }

    buckets
}

/// Seven calendar days ending today, ascending by date.
pub fn activity_buckets<Tz: TimeZone>(
    now: &DateTime<Tz>,
    articles: &[DateTime<Utc>],
    projects: &[DateTime<Utc>],
    slides: &[DateTime<Utc>],
) -> Vec<DayBucket> {
    let mut buckets: HashMap<String, DayBucket> = window_days(now)
        .into_iter()
        .map(|day| {
            let key = day_key(day);
            let bucket = DayBucket {
                date: key.clone(),
                articles_created: 0,
                projects_created: 0,
                slides_created: 0,
            };
            (key, bucket)
        })
        .collect();

    let tz = now.timezone();
    tally(&mut buckets, &tz, articles, |b| &mut b.articles_created);
    tally(&mut buckets, &tz, projects, |b| &mut b.projects_created);
    tally(&mut buckets, &tz, slides, |b| &mut b.slides_created);

    let mut trend: Vec<DayBucket> = buckets.into_values().collect();
    trend.sort_by(|a, b| a.date.cmp(&b.date));
    trend
}

fn tally<Tz: TimeZone>(
    buckets: &mut HashMap<String, DayBucket>,
    tz: &Tz,
    stamps: &[DateTime<Utc>],
    field: fn(&mut DayBucket) -> &mut u32,
) {
    for stamp in stamps {
        if let Some(bucket) = buckets.get_mut(&day_key(local_date(stamp, tz))) {
            *field(bucket) += 1;
        }
    }
}
