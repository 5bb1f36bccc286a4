/// Advisory selection lists surfaced to the front end. Free-text values are
/// still accepted by the session; these are what the dropdowns offer.
pub const COURSES: &[&str] = &[
    "Watercolor Fundamentals",
    "Digital Illustration Basics",
    "Portrait Photography",
    "Logo Design Principles",
    "Procreate for Beginners",
];

pub const FOCUS_AREAS: &[&str] = &[
    "Composition & Layout",
    "Color Theory & Harmony",
    "Technique & Brushwork",
    "Lighting & Shadows",
    "Overall Improvement",
];

pub fn courses() -> Vec<String> {
    COURSES.iter().map(|c| c.to_string()).collect()
}

pub fn focus_areas() -> Vec<String> {
    FOCUS_AREAS.iter().map(|f| f.to_string()).collect()
}
