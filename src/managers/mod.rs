// Restaurant recommender state managers
// Managers own persisted client state: the recent-clicks history.

pub mod click_history_manager;
