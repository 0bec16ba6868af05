use vca_domain::{DamageRecord, DamageReport, FileSelection};

pub fn present_selection(selection: &FileSelection) -> String {
    if selection.is_empty() {
        return "no files selected".to_string();
    }
    format!("{} file(s): {}", selection.len(), selection.display_names())
}

pub fn present_damage_row(index: usize, damage: &DamageRecord) -> String {
    let bounds = damage.bounds;
    format!(
        "{}\t{}\t({}, {}) -> ({}, {})\tseverity={}\tconfidence={}\tcost={}",
        index + 1,
        damage.label,
        bounds.x1,
        bounds.y1,
        bounds.x2,
        bounds.y2,
        optional(damage.severity),
        damage
            .confidence
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "-".to_string()),
        optional(damage.estimated_cost)
    )
}

pub fn present_report(report: &DamageReport) -> String {
    let mut lines = vec![format!(
        "report: {} new damage(s), image {}",
        report.new_damages.len(),
        report.after_image
    )];
    if let Some(session_id) = &report.session_id {
        lines.push(format!("session: {session_id}"));
    }
    if let Some(summary) = &report.summary {
        lines.push(format!("summary: {summary}"));
    }
    lines.extend(
        report
            .new_damages
            .iter()
            .enumerate()
            .map(|(index, damage)| present_damage_row(index, damage)),
    );
    if let Some(total) = report.cost_total() {
        lines.push(format!("estimated total cost: {total}"));
    }
    lines.join("\n")
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vca_domain::{BoundingBox, ImageFile, ImageReference};

    fn scratch() -> DamageRecord {
        let bounds = BoundingBox::from_corners([10.0, 20.0, 50.0, 60.0]).expect("finite");
        DamageRecord {
            severity: Some(3),
            estimated_cost: Some(250),
            ..DamageRecord::new("scratch", bounds)
        }
    }

    #[test]
    fn damage_row_lists_label_corners_and_optional_fields() {
        assert_eq!(
            present_damage_row(0, &scratch()),
            "1\tscratch\t(10, 20) -> (50, 60)\tseverity=3\tconfidence=-\tcost=250"
        );
    }

    #[test]
    fn report_summary_includes_rows_and_total() {
        let mut report = DamageReport::new(
            ImageReference::Remote("https://svc/after.jpg".to_string()),
            vec![scratch(), scratch()],
        );
        report.session_id = Some("abc".to_string());

        let text = present_report(&report);

        assert!(text.starts_with("report: 2 new damage(s), image https://svc/after.jpg"));
        assert!(text.contains("session: abc"));
        assert!(text.contains("2\tscratch"));
        assert!(text.ends_with("estimated total cost: 500"));
    }

    #[test]
    fn selection_lists_names() {
        let selection = FileSelection::new(vec![
            ImageFile::new("a.jpg", vec![1]),
            ImageFile::new("b.jpg", vec![2]),
        ]);
        assert_eq!(present_selection(&selection), "2 file(s): a.jpg, b.jpg");
        assert_eq!(present_selection(&FileSelection::default()), "no files selected");
    }
}
