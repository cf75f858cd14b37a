use crate::args::ListArgs;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::sections::{build_sections, CollapsedSections, Section, SectionView};
use crate::{Config, Result};
use chrono::Local;
use std::fmt::Write;

/// Lists the entries grouped by day, newest first. Days named in `args` are collapsed: their
/// heading and total are shown, their rows are not.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Vec<Section>>> {
    let ledger = Ledger::load(&config).await.pub_result(ErrorType::Storage)?;
    let entries = ledger.entries().as_slice();
    let sections = match config.utc_offset() {
        Some(offset) => build_sections(entries, ledger.categories(), &offset),
        None => build_sections(entries, ledger.categories(), &Local),
    };

    let collapsed: CollapsedSections = args.collapse().iter().copied().collect();
    let views = collapsed.apply(&sections);
    let message = render(&views, entries.len());
    Ok(Out::new(
        message,
        views.iter().map(SectionView::to_section).collect(),
    ))
}

fn render(views: &[SectionView<'_>], entry_count: usize) -> String {
    if views.is_empty() {
        return "No entries".to_string();
    }
    let mut s = format!(
        "{} in {}\n",
        plural(entry_count, "entry", "entries"),
        plural(views.len(), "day", "days")
    );
    for view in views {
        let section = view.section();
        // Writing to a String cannot fail
        let _ = write!(
            s,
            "\n{} {}  expense {}",
            section.date_label, section.weekday_label, section.expense_total
        );
        if view.is_collapsed() {
            let _ = writeln!(s, "  [{} hidden]", section.rows.len());
            continue;
        }
        s.push('\n');
        for row in view.rows() {
            let _ = write!(
                s,
                "  {}  {:<8} {:>12}  {}",
                row.time_label, row.kind, row.amount, row.category_name
            );
            if !row.note.is_empty() {
                let _ = write!(s, "  {}", row.note);
            }
            let _ = writeln!(s, "  ({})", row.entry_id);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::entry;
    use crate::model::{Amount, EntryKind};
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    async fn seed(env: &TestEnv) {
        let mut ledger = env.ledger().await;
        // At UTC+8 these fall on 2026-02-26 (a, b) and 2026-02-25 (c).
        ledger
            .add_entry(entry("a", EntryKind::Expense, 3500, "cat_food", (2026, 2, 26, 4, 0)))
            .unwrap();
        ledger
            .add_entry(entry("b", EntryKind::Income, 900000, "cat_salary", (2026, 2, 26, 1, 0)))
            .unwrap();
        ledger
            .add_entry(entry("c", EntryKind::Expense, 1250, "cat_gone", (2026, 2, 25, 15, 59)))
            .unwrap();
        ledger.save().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list(env.config(), ListArgs::default()).await.unwrap();
        assert_eq!(out.message(), "No entries");
        assert!(out.structure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_groups_by_local_day() {
        let env = TestEnv::with_utc_offset(480).await;
        seed(&env).await;

        let out = list(env.config(), ListArgs::default()).await.unwrap();
        let sections = out.structure().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].date_label, "2026-02-26");
        assert_eq!(sections[0].weekday_label, "Thu");
        assert_eq!(sections[0].expense_total, Amount::from_minor(3500));
        assert_eq!(sections[0].rows.len(), 2);
        assert_eq!(sections[0].rows[0].time_label, "12:00");
        assert_eq!(sections[1].date_label, "2026-02-25");
        assert_eq!(sections[1].rows[0].time_label, "23:59");
        assert_eq!(sections[1].rows[0].category_name, "Uncategorized");

        assert!(out.message().starts_with("3 entries in 2 days"));
        assert!(out.message().contains("2026-02-26 Thu  expense 35.00"));
        assert!(out.message().contains("9,000.00"));
    }

    #[tokio::test]
    async fn test_list_collapse() {
        let env = TestEnv::with_utc_offset(480).await;
        seed(&env).await;

        let day = NaiveDate::from_ymd_opt(2026, 2, 26).unwrap();
        let out = list(env.config(), ListArgs::new(vec![day])).await.unwrap();
        let sections = out.structure().unwrap();
        assert!(sections[0].rows.is_empty());
        assert_eq!(sections[0].expense_total, Amount::from_minor(3500));
        assert_eq!(sections[1].rows.len(), 1);
        assert!(out.message().contains("[2 hidden]"));
    }
}
