//! Weekly timetable grid.

use common::{TimetableDay, TimetableGrid, TimetableSlot};
use model::entities::teacher;
use model::entities::timetable_entry::{self, Weekday};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::error::Result;

/// Restricts which timetable entries are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableFilter {
    pub class: Option<String>,
    pub teacher_id: Option<i32>,
    pub day: Option<Weekday>,
}

const SUBJECT_COLORS: [(&str, &str); 15] = [
    ("mathematics", "#d14444"),
    ("english", "#bb57f5"),
    ("science", "#4facfe"),
    ("history", "#43e97b"),
    ("geography", "#fee140"),
    ("physics", "#30cfd0"),
    ("chemistry", "#a8edea"),
    ("biology", "#5ee7df"),
    ("computer", "#d299c2"),
    ("art", "#f6d365"),
    ("physical education", "#a1c4fd"),
    ("pe", "#a1c4fd"),
    ("music", "#fcb69f"),
    ("business", "#c2e9fb"),
    ("religious", "#fed6e3"),
];

/// Display colour for a subject.
///
/// The first palette keyword contained in the lower-cased name wins. Other
/// subjects get a hue derived from the name, so a subject keeps its colour.
pub fn subject_color(subject: &str) -> String {
    let subject = subject.trim().to_lowercase();
    if subject.is_empty() {
        return "#999999".to_string();
    }

    if let Some((_, color)) = SUBJECT_COLORS
        .iter()
        .find(|(keyword, _)| subject.contains(keyword))
    {
        return color.to_string();
    }

    // hash = c + 31 * hash over unbounded integers; every term is
    // non-negative, so reducing mod 360 at each step gives the same hue.
    let hue = subject
        .chars()
        .fold(0u32, |hash, c| (c as u32 % 360 + 31 * hash) % 360);
    format!("hsl({}, 70%, 60%)", hue)
}

/// Entries matching `filter`, ordered by weekday then period.
#[instrument(skip(db))]
pub async fn entries(
    db: &DatabaseConnection,
    filter: &TimetableFilter,
) -> Result<Vec<(timetable_entry::Model, Option<teacher::Model>)>> {
    let mut query = timetable_entry::Entity::find();
    if let Some(class) = &filter.class {
        query = query.filter(timetable_entry::Column::Class.eq(class.as_str()));
    }
    if let Some(teacher_id) = filter.teacher_id {
        query = query.filter(timetable_entry::Column::TeacherId.eq(teacher_id));
    }
    if let Some(day) = filter.day {
        query = query.filter(timetable_entry::Column::Day.eq(day));
    }

    let mut rows = query.find_also_related(teacher::Entity).all(db).await?;
    // Day names do not sort in week order in SQL.
    rows.sort_by_key(|(entry, _)| (entry.day.index(), entry.period, entry.id));
    Ok(rows)
}

/// Groups the matching entries per weekday, Monday first.
///
/// Monday to Friday are always present. Saturday and Sunday appear only when
/// they have lessons. With a day filter only that day is returned.
#[instrument(skip(db))]
pub async fn weekly_grid(db: &DatabaseConnection, filter: &TimetableFilter) -> Result<TimetableGrid> {
    let rows = entries(db, filter).await?;
    debug!("Building timetable grid from {} entr(ies)", rows.len());

    let days = Weekday::ALL
        .into_iter()
        .filter(|day| match filter.day {
            Some(only) => *day == only,
            None => {
                day.index() < Weekday::Saturday.index()
                    || rows.iter().any(|(entry, _)| entry.day == *day)
            }
        })
        .map(|day| TimetableDay {
            day: day.to_string(),
            slots: rows
                .iter()
                .filter(|(entry, _)| entry.day == day)
                .map(|(entry, teacher)| to_slot(entry, teacher.as_ref()))
                .collect(),
        })
        .collect();

    Ok(TimetableGrid { days })
}

pub fn to_slot(entry: &timetable_entry::Model, teacher: Option<&teacher::Model>) -> TimetableSlot {
    TimetableSlot {
        id: entry.id,
        class: entry.class.clone(),
        period: entry.period,
        subject: entry.subject.clone(),
        teacher_id: entry.teacher_id,
        teacher_name: teacher.map(|t| t.name.clone()),
        room: entry.room.clone(),
        description: entry.description.clone(),
        color: subject_color(&entry.subject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_teacher, setup_db};
    use sea_orm::{ActiveModelTrait, Set};

    async fn add_slot(
        db: &DatabaseConnection,
        class: &str,
        day: Weekday,
        period: i32,
        subject: &str,
        teacher_id: Option<i32>,
    ) -> timetable_entry::Model {
        timetable_entry::ActiveModel {
            class: Set(class.to_string()),
            day: Set(day),
            period: Set(period),
            subject: Set(subject.to_string()),
            teacher_id: Set(teacher_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[test]
    fn test_subject_color_palette() {
        assert_eq!(subject_color("Mathematics"), "#d14444");
        assert_eq!(subject_color("  Advanced MATHEMATICS "), "#d14444");
        assert_eq!(subject_color("English Literature"), "#bb57f5");
        assert_eq!(subject_color("Computer Studies"), "#d299c2");
        assert_eq!(subject_color("Business Studies"), "#c2e9fb");
        assert_eq!(subject_color(""), "#999999");
        assert_eq!(subject_color("   "), "#999999");
    }

    #[test]
    fn test_subject_color_hash_is_stable() {
        let color = subject_color("Kiswahili");
        assert!(color.starts_with("hsl("));
        assert!(color.ends_with(", 70%, 60%)"));
        assert_eq!(color, subject_color("kiswahili"));

        let hue: i32 = color["hsl(".len()..color.find(',').unwrap()].parse().unwrap();
        assert!((0..360).contains(&hue));
    }

    #[test]
    fn test_subject_color_hue_for_long_names() {
        assert_eq!(subject_color("French"), "hsl(210, 70%, 60%)");
        assert_eq!(subject_color("Kiswahili"), "hsl(245, 70%, 60%)");
        assert_eq!(subject_color(" Agriculture "), "hsl(321, 70%, 60%)");
    }

    #[tokio::test]
    async fn test_grid_orders_days_and_periods() {
        let db = setup_db().await.unwrap();
        let teacher = new_teacher(&db, "Wanjiku Njeri").await.unwrap();

        add_slot(&db, "Form 1", Weekday::Tuesday, 1, "English", None).await;
        add_slot(&db, "Form 1", Weekday::Monday, 3, "Biology", None).await;
        add_slot(&db, "Form 1", Weekday::Monday, 1, "Mathematics", Some(teacher.id)).await;
        add_slot(&db, "Form 2", Weekday::Monday, 2, "History", None).await;

        let grid = weekly_grid(
            &db,
            &TimetableFilter {
                class: Some("Form 1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let names: Vec<&str> = grid.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(names, vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);

        let monday: Vec<(i32, &str)> = grid.days[0]
            .slots
            .iter()
            .map(|s| (s.period, s.subject.as_str()))
            .collect();
        assert_eq!(monday, vec![(1, "Mathematics"), (3, "Biology")]);
        assert_eq!(grid.days[0].slots[0].teacher_name.as_deref(), Some("Wanjiku Njeri"));
        assert_eq!(grid.days[0].slots[0].color, "#d14444");
        assert_eq!(grid.days[1].slots.len(), 1);
        assert!(grid.days[2].slots.is_empty());
    }

    #[tokio::test]
    async fn test_grid_filters() {
        let db = setup_db().await.unwrap();
        let teacher = new_teacher(&db, "Otieno Ochieng").await.unwrap();

        add_slot(&db, "Form 1", Weekday::Saturday, 1, "Music", Some(teacher.id)).await;
        add_slot(&db, "Form 2", Weekday::Friday, 2, "Art", Some(teacher.id)).await;
        add_slot(&db, "Form 2", Weekday::Friday, 1, "Physics", None).await;

        let by_teacher = weekly_grid(
            &db,
            &TimetableFilter {
                teacher_id: Some(teacher.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        // Saturday shows up because it has a lesson.
        assert_eq!(by_teacher.days.len(), 6);
        assert_eq!(by_teacher.days[5].day, "Saturday");
        assert_eq!(by_teacher.days[4].slots.len(), 1);

        let friday = weekly_grid(
            &db,
            &TimetableFilter {
                day: Some(Weekday::Friday),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(friday.days.len(), 1);
        let periods: Vec<i32> = friday.days[0].slots.iter().map(|s| s.period).collect();
        assert_eq!(periods, vec![1, 2]);
    }
}
