use super::model::LongRecord;

/// One country's line on the chart. A missing value breaks the line, so a
/// series may consist of several disjoint segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub country: String,
    /// `[year, value]` points, each segment ascending by year.
    pub segments: Vec<Vec<[f64; 2]>>,
}

/// Group plotted rows into per-country series, countries in first-seen order.
pub fn build_series(rows: &[LongRecord]) -> Vec<Series> {
    let mut grouped: Vec<(&str, Vec<&LongRecord>)> = Vec::new();
    for r in rows {
        match grouped.iter_mut().find(|(c, _)| *c == r.country) {
            Some((_, group)) => group.push(r),
            None => grouped.push((r.country.as_str(), vec![r])),
        }
    }

    grouped
        .into_iter()
        .map(|(country, mut group)| {
            group.sort_by_key(|r| r.year);

            let mut segments = Vec::new();
            let mut current: Vec<[f64; 2]> = Vec::new();
            for r in group {
                match r.value {
                    Some(v) => current.push([r.year as f64, v]),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }

            Series {
                country: country.to_string(),
                segments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, year: i32, value: Option<f64>) -> LongRecord {
        LongRecord {
            country: country.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn missing_value_splits_the_line() {
        let rows = vec![
            rec("A", 2000, Some(10.0)),
            rec("A", 2001, None),
            rec("A", 2002, Some(30.0)),
            rec("A", 2003, Some(40.0)),
        ];
        let series = build_series(&rows);
        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0].segments,
            vec![vec![[2000.0, 10.0]], vec![[2002.0, 30.0], [2003.0, 40.0]]]
        );
    }

    #[test]
    fn countries_keep_first_seen_order_and_sort_by_year() {
        let rows = vec![
            rec("B", 2001, Some(2.0)),
            rec("A", 2000, Some(1.0)),
            rec("B", 2000, Some(3.0)),
        ];
        let series = build_series(&rows);
        let names: Vec<&str> = series.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(series[0].segments, vec![vec![[2000.0, 3.0], [2001.0, 2.0]]]);
    }

    #[test]
    fn country_with_only_gaps_has_no_segments() {
        let series = build_series(&[rec("A", 2000, None), rec("A", 2001, None)]);
        assert_eq!(series.len(), 1);
        assert!(series[0].segments.is_empty());
    }
}
