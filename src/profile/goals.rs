use crate::profile::repo::UserProfile;

/// Basal metabolic rate via Mifflin-St Jeor, rounded to the nearest kcal.
/// Anything other than "male" takes the female constant.
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: i32, sex: &str) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let bmr = if sex.eq_ignore_ascii_case("male") {
        base + 5.0
    } else {
        base - 161.0
    };
    bmr.round()
}

pub fn bmr_for(profile: &UserProfile) -> Option<f64> {
    match (
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.sex.as_deref(),
    ) {
        (Some(w), Some(h), Some(a), Some(s)) => Some(mifflin_st_jeor(w, h, a, s)),
        _ => None,
    }
}

/// Daily calorie goal implied by the macro goals: 4 kcal/g for protein and
/// carbohydrate, 9 kcal/g for fat.
pub fn calorie_goal_for(profile: &UserProfile) -> Option<f64> {
    match (
        profile.protein_goal_g,
        profile.carbs_goal_g,
        profile.fat_goal_g,
    ) {
        (Some(p), Some(c), Some(f)) => Some(p * 4.0 + c * 4.0 + f * 9.0),
        _ => None,
    }
}
