//! Queue classification and ordering.
//!
//! Each queue is a predicate over one animal's recorded dates and flags on a
//! given day, evaluated independently: an animal may sit in several queues at
//! once. Missing base dates mean "not a member", never a default date.
//!
//! The predicates do not look at `active` or `sorted_out`; callers decide
//! which records to classify (the dashboard passes active animals only).

use chrono::NaiveDate;
use std::cmp::Ordering;

use shared::{PregnancyCheck, QueueKind};

use crate::domain::breeding::{days_since, heat_origin, age_in_months, BreedingConstants};
use crate::domain::models::Animal;

/// Every queue the animal belongs to today, in dashboard order
pub fn classify(animal: &Animal, today: NaiveDate, constants: &BreedingConstants) -> Vec<QueueKind> {
    QueueKind::ALL
        .iter()
        .copied()
        .filter(|queue| is_member(*queue, animal, today, constants))
        .collect()
}

pub fn is_member(queue: QueueKind, animal: &Animal, today: NaiveDate, constants: &BreedingConstants) -> bool {
    match queue {
        QueueKind::HeatObservation => needs_heat_observation(animal, today, constants),
        QueueKind::HeatExpected => heat_expected(animal, today, constants),
        QueueKind::PregnancyCheck => pregnancy_check_due(animal, today, constants),
        QueueKind::DryOff => {
            animal.is_pregnant()
                && animal.is_cow()
                && animal.dry_off_date.is_none()
                && animal.insemination_date.is_some()
        }
        QueueKind::Calving => animal.is_pregnant() && animal.insemination_date.is_some(),
        QueueKind::DriedOff => animal.dry_off_date.is_some(),
        QueueKind::RecentlyCalved => animal
            .calving_date
            .map_or(false, |calved| calved <= today && days_since(calved, today) <= constants.recently_calved_days),
        QueueKind::HoofCare => animal.hoof_care_needed,
    }
}

/// Heifers of cycling age and cows past the post-calving wait with no heat
/// on record yet
fn needs_heat_observation(animal: &Animal, today: NaiveDate, constants: &BreedingConstants) -> bool {
    if animal.is_pregnant() || animal.last_heat.is_some() {
        return false;
    }
    match (animal.calving_date, animal.birth_date) {
        (Some(calved), _) => days_since(calved, today) > constants.post_calving_wait_days,
        (None, Some(birth)) => age_in_months(birth, today) >= constants.heifer_cycling_age_months,
        (None, None) => false,
    }
}

fn heat_expected(animal: &Animal, today: NaiveDate, constants: &BreedingConstants) -> bool {
    if animal.is_pregnant() {
        return false;
    }
    heat_origin(animal).map_or(false, |origin| constants.heat_window_contains(origin, today))
}

fn pregnancy_check_due(animal: &Animal, today: NaiveDate, constants: &BreedingConstants) -> bool {
    match animal.pregnancy_check {
        PregnancyCheck::Uncertain => true,
        PregnancyCheck::Unset => animal
            .insemination_date
            .map_or(false, |inseminated| days_since(inseminated, today) >= constants.pregnancy_check_days),
        PregnancyCheck::Positive | PregnancyCheck::Negative => false,
    }
}

/// Members of one queue, ordered by urgency
pub fn build_queue(
    queue: QueueKind,
    animals: &[Animal],
    today: NaiveDate,
    constants: &BreedingConstants,
) -> Vec<Animal> {
    let mut members: Vec<Animal> = animals
        .iter()
        .filter(|animal| is_member(queue, animal, today, constants))
        .cloned()
        .collect();
    sort_queue(queue, &mut members, constants);
    members
}

/// Order a queue's members. The id is the final tie-break, so the result
/// does not depend on the input order.
pub fn sort_queue(queue: QueueKind, members: &mut [Animal], constants: &BreedingConstants) {
    members.sort_by(|a, b| compare_in_queue(queue, a, b, constants).then_with(|| a.id.cmp(&b.id)));
}

fn compare_in_queue(queue: QueueKind, a: &Animal, b: &Animal, constants: &BreedingConstants) -> Ordering {
    match queue {
        QueueKind::HeatObservation | QueueKind::HeatExpected => compare_heat_rank(a, b),
        QueueKind::PregnancyCheck => compare_dates(
            a.insemination_date.map(|date| constants.pregnancy_check_due_date(date)),
            b.insemination_date.map(|date| constants.pregnancy_check_due_date(date)),
        ),
        QueueKind::DryOff => compare_dates(
            a.insemination_date.map(|date| constants.dry_off_due_date(date)),
            b.insemination_date.map(|date| constants.dry_off_due_date(date)),
        ),
        QueueKind::Calving | QueueKind::DriedOff => compare_dates(
            constants.calving_due_date(a.insemination_date),
            constants.calving_due_date(b.insemination_date),
        ),
        QueueKind::RecentlyCalved => compare_dates(a.calving_date, b.calving_date),
        QueueKind::HoofCare => Ordering::Equal,
    }
}

/// Heifers (oldest first) before cows (longest since calving first)
fn compare_heat_rank(a: &Animal, b: &Animal) -> Ordering {
    match (a.is_heifer(), b.is_heifer()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => compare_dates(a.birth_date, b.birth_date),
        (false, false) => compare_dates(a.calving_date, b.calving_date),
    }
}

/// Ascending, with missing dates last
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breeding::add_days;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn heifer(id: i64, born_days_ago: i64) -> Animal {
        let mut animal = Animal::new(format!("Heifer {}", id), format!("H{}", id), Utc::now());
        animal.id = id;
        animal.birth_date = Some(add_days(today(), -born_days_ago));
        animal
    }

    fn cow(id: i64, calved_days_ago: i64) -> Animal {
        let mut animal = Animal::new(format!("Cow {}", id), format!("C{}", id), Utc::now());
        animal.id = id;
        animal.birth_date = Some(add_days(today(), -1500));
        animal.calving_date = Some(add_days(today(), -calved_days_ago));
        animal
    }

    fn ids(animals: &[Animal]) -> Vec<i64> {
        animals.iter().map(|animal| animal.id).collect()
    }

    #[test]
    fn test_heifer_of_cycling_age_needs_heat_observation() {
        let constants = BreedingConstants::default();
        let animal = heifer(1, 450);

        assert_eq!(classify(&animal, today(), &constants), vec![QueueKind::HeatObservation]);
    }

    #[test]
    fn test_young_heifer_is_never_observed_for_heat() {
        let constants = BreedingConstants::default();
        for born_days_ago in 0..300 {
            let animal = heifer(1, born_days_ago);
            assert!(age_in_months(animal.birth_date.unwrap(), today()) < 14);
            assert!(!is_member(QueueKind::HeatObservation, &animal, today(), &constants));
        }
    }

    #[test]
    fn test_heifer_without_birth_date_is_not_classified() {
        let constants = BreedingConstants::default();
        let mut animal = heifer(1, 450);
        animal.birth_date = None;

        assert!(classify(&animal, today(), &constants).is_empty());
    }

    #[test]
    fn test_cow_waits_after_calving_before_heat_observation() {
        let constants = BreedingConstants::default();

        assert!(!is_member(QueueKind::HeatObservation, &cow(1, 19), today(), &constants));
        assert!(is_member(QueueKind::HeatObservation, &cow(1, 20), today(), &constants));
    }

    #[test]
    fn test_observed_heat_leaves_observation_queue() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 40);
        animal.last_heat = Some(add_days(today(), -3));

        assert!(!is_member(QueueKind::HeatObservation, &animal, today(), &constants));
        assert!(!is_member(QueueKind::HeatExpected, &animal, today(), &constants));
    }

    #[test]
    fn test_heat_expected_a_few_days_ahead() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 60);
        animal.last_heat = Some(add_days(today(), -18));

        assert!(is_member(QueueKind::HeatExpected, &animal, today(), &constants));
    }

    #[test]
    fn test_pregnant_animals_never_in_heat_queues() {
        let constants = BreedingConstants::default();
        for days_ago in 0..400 {
            let mut animal = cow(1, 400);
            animal.last_heat = Some(add_days(today(), -days_ago));
            animal.insemination_date = animal.last_heat;
            animal.pregnancy_check = PregnancyCheck::Positive;

            let queues = classify(&animal, today(), &constants);
            assert!(!queues.contains(&QueueKind::HeatObservation));
            assert!(!queues.contains(&QueueKind::HeatExpected));
        }
    }

    #[test]
    fn test_cow_inseminated_46_days_ago_needs_pregnancy_check() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 120);
        animal.insemination_date = Some(add_days(today(), -46));
        animal.last_heat = animal.insemination_date;

        assert!(is_member(QueueKind::PregnancyCheck, &animal, today(), &constants));

        animal.pregnancy_check = PregnancyCheck::Negative;
        assert!(!is_member(QueueKind::PregnancyCheck, &animal, today(), &constants));
    }

    #[test]
    fn test_pregnancy_check_not_due_before_45_days() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 120);
        animal.insemination_date = Some(add_days(today(), -44));

        assert!(!is_member(QueueKind::PregnancyCheck, &animal, today(), &constants));
    }

    #[test]
    fn test_uncertain_outcome_stays_in_pregnancy_check_queue() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 120);
        animal.insemination_date = Some(add_days(today(), -50));
        animal.pregnancy_check = PregnancyCheck::Uncertain;

        assert!(is_member(QueueKind::PregnancyCheck, &animal, today(), &constants));
    }

    #[test]
    fn test_pregnant_cow_in_dry_off_and_calving_queues() {
        let constants = BreedingConstants::default();
        let mut animal = cow(1, 300);
        animal.insemination_date = Some(add_days(today(), -215));
        animal.last_heat = animal.insemination_date;
        animal.pregnancy_check = PregnancyCheck::Positive;

        let queues = classify(&animal, today(), &constants);
        assert_eq!(queues, vec![QueueKind::DryOff, QueueKind::Calving]);

        animal.dry_off_date = Some(add_days(today(), -1));
        let queues = classify(&animal, today(), &constants);
        assert_eq!(queues, vec![QueueKind::Calving, QueueKind::DriedOff]);
    }

    #[test]
    fn test_pregnant_heifer_is_not_dried_off() {
        let constants = BreedingConstants::default();
        let mut animal = heifer(1, 700);
        animal.insemination_date = Some(add_days(today(), -100));
        animal.last_heat = animal.insemination_date;
        animal.pregnancy_check = PregnancyCheck::Positive;

        assert!(!is_member(QueueKind::DryOff, &animal, today(), &constants));
        assert!(is_member(QueueKind::Calving, &animal, today(), &constants));
    }

    #[test]
    fn test_recently_calved_window() {
        let constants = BreedingConstants::default();

        assert!(is_member(QueueKind::RecentlyCalved, &cow(1, 0), today(), &constants));
        assert!(is_member(QueueKind::RecentlyCalved, &cow(1, 60), today(), &constants));
        assert!(!is_member(QueueKind::RecentlyCalved, &cow(1, 61), today(), &constants));
    }

    #[test]
    fn test_hoof_care_is_independent_of_cycle_state() {
        let constants = BreedingConstants::default();
        let mut animal = heifer(1, 100);
        animal.hoof_care_needed = true;

        assert_eq!(classify(&animal, today(), &constants), vec![QueueKind::HoofCare]);
    }

    #[test]
    fn test_heat_queue_puts_heifers_before_cows() {
        let constants = BreedingConstants::default();
        let animals = vec![cow(1, 40), heifer(2, 500), cow(3, 90), heifer(4, 600), heifer(5, 450)];

        let queue = build_queue(QueueKind::HeatObservation, &animals, today(), &constants);

        assert_eq!(ids(&queue), vec![4, 2, 5, 3, 1]);
    }

    #[test]
    fn test_heat_queue_puts_missing_birth_date_last_among_heifers() {
        let mut a = heifer(1, 500);
        a.birth_date = None;
        let b = heifer(2, 450);
        let c = cow(3, 40);
        let mut members = vec![c, a, b];

        sort_queue(QueueKind::HeatExpected, &mut members, &BreedingConstants::default());

        assert_eq!(ids(&members), vec![2, 1, 3]);
    }

    #[test]
    fn test_pregnancy_check_queue_orders_by_due_date_with_missing_last() {
        let constants = BreedingConstants::default();
        let mut early = cow(1, 200);
        early.insemination_date = Some(add_days(today(), -90));
        let mut late = cow(2, 200);
        late.insemination_date = Some(add_days(today(), -50));
        let mut uncertain = cow(3, 200);
        uncertain.pregnancy_check = PregnancyCheck::Uncertain;

        let queue = build_queue(QueueKind::PregnancyCheck, &[uncertain, late, early], today(), &constants);

        assert_eq!(ids(&queue), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_deterministic_for_any_input_order() {
        let constants = BreedingConstants::default();
        let animals = vec![cow(7, 40), cow(3, 40), heifer(5, 450), heifer(2, 450), cow(9, 25)];
        let expected = build_queue(QueueKind::HeatObservation, &animals, today(), &constants);
        assert_eq!(ids(&expected), vec![2, 5, 3, 7, 9]);

        let mut reversed = animals.clone();
        reversed.reverse();
        let mut rotated = animals.clone();
        rotated.rotate_left(2);

        for input in [reversed, rotated] {
            let queue = build_queue(QueueKind::HeatObservation, &input, today(), &constants);
            assert_eq!(ids(&queue), ids(&expected));

            let mut again = queue.clone();
            sort_queue(QueueKind::HeatObservation, &mut again, &constants);
            assert_eq!(ids(&again), ids(&queue));
        }
    }
}
