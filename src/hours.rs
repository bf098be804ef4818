use crate::model::AssignmentKind;

/// Heures comptées pour une affectation selon le type de jour.
///
/// Une vacation vaut toujours 8 h. Une garde couvre la journée entière
/// un jour de repos (20 h) et seulement la part non ouvrée un jour
/// travaillé (12 h).
pub fn hours_for(kind: AssignmentKind, is_rest_day: bool) -> i32 {
    match kind {
        AssignmentKind::Work => 8,
        AssignmentKind::AllDay => {
            if is_rest_day {
                20
            } else {
                12
            }
        }
    }
}
