use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use crate::models::resume::ApplicationLog;
use crate::models::vacancy::ChartData;

const WEEK: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
    (Weekday::Sun, "Sunday"),
];

/// Applications per weekday over the seven days ending at `now`, Monday first.
pub fn weekly_chart(logs: &[ApplicationLog], now: DateTime<Utc>) -> Vec<ChartData> {
    let since = now - Duration::days(7);
    let mut counts = [0u32; 7];
    for log in logs
        .iter()
        .filter(|l| l.applied_at > since && l.applied_at <= now)
    {
        counts[log.applied_at.weekday().num_days_from_monday() as usize] += 1;
    }

    WEEK.iter()
        .zip(counts)
        .map(|((_, name), applications)| ChartData {
            name: name.to_string(),
            applications,
        })
        .collect()
}
