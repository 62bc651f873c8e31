//! Static exercise templates, keyed by day type.
//!
//! The table is compiled into the binary and never mutated.

use serde::Serialize;

use crate::workout_model::DayType;

/// Reference data used to seed new workouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub name: &'static str,
    pub default_sets: u32,
    /// Free text such as `"8-12"` or `"10 min"`.
    pub default_reps: &'static str,
    pub category: DayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technique: Option<&'static str>,
    /// `h:m:s` rest between sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'static str>,
}

const ONE_MINUTE: Option<&str> = Some("0:1:0");
const SUPER_SETS: Option<&str> = Some("Super Sets");

const fn template(name: &'static str, default_sets: u32, default_reps: &'static str, category: DayType) -> ExerciseTemplate {
    ExerciseTemplate {
        name,
        default_sets,
        default_reps,
        category,
        notes: None,
        technique: None,
        rest_time: None,
        image_url: None,
    }
}

/// Standard 2 x 8-12 with a minute of rest, the shape most templates share.
const fn standard(name: &'static str, category: DayType) -> ExerciseTemplate {
    ExerciseTemplate { rest_time: ONE_MINUTE, ..template(name, 2, "8-12", category) }
}

static PUSH: [ExerciseTemplate; 6] = [
    standard("Cable Lateral Raises", DayType::Push),
    standard("One Arm Dumbbell Lateral Raise", DayType::Push),
    standard("Single Arm Cable Tri-Pushdown", DayType::Push),
    standard("Tricep Overhead Extension with Rope", DayType::Push),
    ExerciseTemplate { technique: SUPER_SETS, ..standard("Palms-Down Barbell Wrist Curl", DayType::Push) },
    ExerciseTemplate { technique: SUPER_SETS, ..standard("Palms-Up Barbell Wrist Curl", DayType::Push) },
];

static PULL: [ExerciseTemplate; 8] = [
    standard("Wide Grip Lat Pulldown", DayType::Pull),
    standard("Wide Seated Row Male", DayType::Pull),
    standard("T-Bar Row Wide Grip", DayType::Pull),
    standard("Seated Cable Single Row", DayType::Pull),
    standard("Dumbbell Shrug", DayType::Pull),
    ExerciseTemplate { technique: SUPER_SETS, ..standard("Cable Rear Delt Fly", DayType::Pull) },
    ExerciseTemplate { notes: Some("بالزوايلك"), ..standard("Preacher Barbell Curl", DayType::Pull) },
    standard("Single Arm Cable Bicep Curl", DayType::Pull),
];

static LEG: [ExerciseTemplate; 5] = [
    ExerciseTemplate {
        notes: Some("الضغط عليه جامد مع هيفس البتير الثنائي اثناء او في نهاية التاني عادي بس"),
        ..standard("Seated Leg Curl", DayType::Leg)
    },
    standard("Leg Extension", DayType::Leg),
    standard("Squat Smith", DayType::Leg),
    standard("Deadlift Technique", DayType::Leg),
    standard("Seated Machine Calf Press", DayType::Leg),
];

static UPPER: [ExerciseTemplate; 5] = [
    ExerciseTemplate {
        notes: Some("تسخين عشر دقائق قبل التمرين"),
        ..template("Treadmill", 1, "10 min", DayType::Upper)
    },
    template("Side Plank", 3, "12", DayType::Upper),
    template("Cable Crunch", 3, "8-12", DayType::Upper),
    template("Cable Crunch", 4, "12", DayType::Upper),
    ExerciseTemplate { technique: SUPER_SETS, ..standard("Crunch", DayType::Upper) },
];

pub fn templates_for(day: DayType) -> &'static [ExerciseTemplate] {
    match day {
        DayType::Push => &PUSH,
        DayType::Pull => &PULL,
        DayType::Leg => &LEG,
        DayType::Upper => &UPPER,
    }
}

/// First template of `day` with exactly this name.
pub fn find_template(day: DayType, name: &str) -> Option<&'static ExerciseTemplate> {
    templates_for(day).iter().find(|template| template.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_day_has_templates_in_its_own_category() {
        for day in DayType::ALL {
            let templates = templates_for(day);
            assert!(!templates.is_empty());
            assert!(templates.iter().all(|t| t.category == day));
        }
        assert_eq!(templates_for(DayType::Push).len(), 6);
        assert_eq!(templates_for(DayType::Pull).len(), 8);
        assert_eq!(templates_for(DayType::Leg).len(), 5);
        assert_eq!(templates_for(DayType::Upper).len(), 5);
    }

    #[test]
    fn find_returns_first_match() {
        let crunch = find_template(DayType::Upper, "Cable Crunch").unwrap();
        assert_eq!(crunch.default_sets, 3);
        assert!(find_template(DayType::Push, "Cable Crunch").is_none());
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let json = serde_json::to_value(&templates_for(DayType::Push)[4]).unwrap();
        assert_eq!(json["defaultSets"], 2);
        assert_eq!(json["technique"], "Super Sets");
        assert!(json.get("imageUrl").is_none());
    }
}
