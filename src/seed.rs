use sqlx::PgPool;
use tracing::{info, instrument};

use crate::{
    auth::password::hash_password,
    metabolism::ExerciseFrequency,
    profiles::{repo, AccountType, Profile, Sex},
};

pub const DEMO_PASSWORD: &str = "nutriplan-demo";

fn ana(hash: &str) -> Profile {
    let mut p = Profile::new("ana@email.com", hash, "Ana Silva", AccountType::User);
    p.sex = Some(Sex::Female);
    p.age = Some(28);
    p.weight_kg = Some(65.5);
    p.height_cm = Some(165.0);
    p.goal = Some("perder peso".into());
    p.budget_per_meal = Some(25.0);
    p.dietary_restrictions = Some("Lactose free".into());
    p.body.waist_cm = Some(78.0);
    p.body.weight_6mo_ago = Some(70.0);
    p.body.target_weight = Some(60.0);
    p.body.weight_variation_pattern = Some("gains easily".into());
    p.behavior.meal_times = Some("breakfast 07:00, lunch 12:00, dinner 19:00".into());
    p.behavior.eating_speed = Some("normal".into());
    p.behavior.snack_frequency = Some("rarely".into());
    p.behavior.water_intake = Some(8);
    p.behavior.alcohol_use = Some("social".into());
    p.behavior.food_dislikes = Some("Broccoli, liver".into());
    p.lifestyle.sleep_hours = Some(7.5);
    p.lifestyle.sleep_quality = Some("fair".into());
    p.lifestyle.stress_level = Some(7);
    p.lifestyle.work_routine = Some("sedentary".into());
    p.lifestyle.work_schedule = Some("office hours".into());
    p.family_history.diabetes = true;
    p.family_history.hypertension = true;
    p.activity.current_exercise = Some("Walking".into());
    p.activity.exercise_frequency = Some(ExerciseFrequency::Label("leve".into()));
    p.activity.duration_min = Some(30);
    p.activity.intensity = Some("light".into());
    p.self_assessment.energy_level = Some(6);
    p.self_assessment.disposition_level = Some(7);
    p.self_assessment.bloating_frequency = Some("often".into());
    p.self_assessment.hunger_pattern = Some("very hungry".into());
    p.goal_details.monthly_weight_goal = Some(2.0);
    p.goal_details.timeframe_months = Some(6);
    p.goal_details.motivation = Some("Better health and self-esteem".into());
    p.goal_details.previous_diet_experience =
        Some("Tried several diets but always gave up".into());
    p
}

fn maria(hash: &str) -> Profile {
    let mut p = Profile::new(
        "maria@nutricionista.com",
        hash,
        "Dr. Maria Oliveira",
        AccountType::Nutritionist,
    );
    p.license_number = Some("CRN-3 12345".into());
    p.specialization = Some("Clinical and Sports Nutrition".into());
    p
}

fn carlos(hash: &str) -> Profile {
    let mut p = Profile::new("carlos@email.com", hash, "Carlos Santos", AccountType::User);
    p.sex = Some(Sex::Male);
    p.age = Some(35);
    p.weight_kg = Some(85.0);
    p.height_cm = Some(178.0);
    p.goal = Some("ganhar massa".into());
    p.budget_per_meal = Some(30.0);
    p.activity.exercise_frequency = Some(ExerciseFrequency::Label("moderado".into()));
    p.lifestyle.stress_level = Some(5);
    p.self_assessment.energy_level = Some(8);
    p
}

pub fn demo_profiles(hash: &str) -> Vec<Profile> {
    vec![ana(hash), maria(hash), carlos(hash)]
}

/// Inserts the demo accounts that do not exist yet, matched by email.
#[instrument(skip(db))]
pub async fn seed_demo_data(db: &PgPool) -> anyhow::Result<usize> {
    let hash = hash_password(DEMO_PASSWORD)?;
    let mut inserted = 0;
    for profile in demo_profiles(&hash) {
        if repo::find_by_email(db, &profile.email).await?.is_some() {
            continue;
        }
        repo::insert(db, &profile).await?;
        info!(email = %profile.email, "demo profile created");
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolism::{GoalClass, MetabolicSnapshot};

    #[test]
    fn demo_profiles_cover_each_role_and_goal() {
        let profiles = demo_profiles("hash");
        assert_eq!(profiles.len(), 3);
        assert_eq!(
            profiles.iter().filter(|p| p.is_nutritionist()).count(),
            1
        );

        let classes: Vec<_> = profiles
            .iter()
            .filter(|p| !p.is_nutritionist())
            .map(|p| MetabolicSnapshot::of(p).goal_class)
            .collect();
        assert_eq!(classes, vec![GoalClass::Lose, GoalClass::Gain]);
    }

    #[test]
    fn demo_password_meets_minimum_length() {
        assert!(crate::auth::password::check_new_password(DEMO_PASSWORD).is_ok());
    }
}
