//! Localized default titles for events.
//!
//! Every event starts from the default title of its type in every registered
//! language; caller-supplied titles override these per language.

use crate::model::EventType;

/// Default title for each event type in one language
#[derive(Debug, Clone)]
pub struct EventTitles {
    pub morning_lesson: &'static str,
    pub noon_lesson: &'static str,
    pub evening_lesson: &'static str,
    pub meal: &'static str,
    pub convention: &'static str,
    pub lecture: &'static str,
    pub other: &'static str,
}

impl EventTitles {
    /// Title used for an event of the given type
    pub fn title(&self, event_type: EventType) -> &'static str {
        match event_type {
            EventType::MorningLesson => self.morning_lesson,
            EventType::NoonLesson => self.noon_lesson,
            EventType::EveningLesson => self.evening_lesson,
            EventType::Meal => self.meal,
            EventType::Convention => self.convention,
            EventType::Lecture => self.lecture,
            EventType::Other => self.other,
        }
    }
}

// ==================== Hebrew (canonical) ====================

pub const HEBREW_TITLES: EventTitles = EventTitles {
    morning_lesson: "שיעור בוקר",
    noon_lesson: "שיעור צהריים",
    evening_lesson: "שיעור ערב",
    meal: "סעודה",
    convention: "כנס",
    lecture: "הרצאה",
    other: "אחר",
};

pub const ENGLISH_TITLES: EventTitles = EventTitles {
    morning_lesson: "Morning Lesson",
    noon_lesson: "Noon Lesson",
    evening_lesson: "Evening Lesson",
    meal: "Meal",
    convention: "Convention",
    lecture: "Lecture",
    other: "Other",
};

pub const RUSSIAN_TITLES: EventTitles = EventTitles {
    morning_lesson: "Утренний урок",
    noon_lesson: "Дневной урок",
    evening_lesson: "Вечерний урок",
    meal: "Трапеза",
    convention: "Конгресс",
    lecture: "Лекция",
    other: "Другое",
};

pub const SPANISH_TITLES: EventTitles = EventTitles {
    morning_lesson: "Lección matutina",
    noon_lesson: "Lección del mediodía",
    evening_lesson: "Lección nocturna",
    meal: "Comida",
    convention: "Congreso",
    lecture: "Conferencia",
    other: "Otro",
};

pub const GERMAN_TITLES: EventTitles = EventTitles {
    morning_lesson: "Morgenlektion",
    noon_lesson: "Mittagslektion",
    evening_lesson: "Abendlektion",
    meal: "Mahlzeit",
    convention: "Kongress",
    lecture: "Vortrag",
    other: "Andere",
};

pub const ITALIAN_TITLES: EventTitles = EventTitles {
    morning_lesson: "Lezione mattutina",
    noon_lesson: "Lezione di mezzogiorno",
    evening_lesson: "Lezione serale",
    meal: "Pasto",
    convention: "Congresso",
    lecture: "Conferenza",
    other: "Altro",
};

pub const FRENCH_TITLES: EventTitles = EventTitles {
    morning_lesson: "Leçon du matin",
    noon_lesson: "Leçon de midi",
    evening_lesson: "Leçon du soir",
    meal: "Repas",
    convention: "Congrès",
    lecture: "Conférence",
    other: "Autre",
};

pub const UKRAINIAN_TITLES: EventTitles = EventTitles {
    morning_lesson: "Ранковий урок",
    noon_lesson: "Денний урок",
    evening_lesson: "Вечірній урок",
    meal: "Трапеза",
    convention: "Конгрес",
    lecture: "Лекція",
    other: "Інше",
};
