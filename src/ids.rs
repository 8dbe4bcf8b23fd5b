//! DOM id derivation. Assistive technology and the visual layer both key off
//! these exact strings.

/// Id of the candidate listbox (`aria-controls` target).
pub fn listbox_id(instance_id: &str) -> String {
    format!("{instance_id}-listbox")
}

/// Id of the candidate whose option sits at `position` (1-based) in the
/// option set.
pub fn option_id(instance_id: &str, position: usize) -> String {
    format!("{instance_id}-listbox-option-{position}")
}

/// Id of the listbox holding selected pills.
pub fn selected_listbox_id(instance_id: &str) -> String {
    format!("{instance_id}-selected-listbox")
}

/// Id of the pill at `position` (1-based) in the selection.
pub fn pill_id(instance_id: &str, position: usize) -> String {
    format!("{instance_id}-pill-{position}")
}
