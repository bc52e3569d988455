//! Pure project tree and time aggregation logic. Nothing here touches storage or the terminal.

pub mod report;
pub mod time;
pub mod tree;

pub use report::{
    Report, ReportRow, build_report, project_time_entries, toggle_filter, total_project_time,
    total_tree_time,
};
pub use time::{
    DateRange, RANGE_PRESETS, RangePreset, SortDirection, calculate_duration, duration_between,
    entry_duration, format_duration, round_duration, sort_by_time,
};
pub use tree::{
    NO_PROJECT_LABEL, ProjectTreeNode, check_reparent, descendant_ids, is_descendant, name_tree,
    sorted_projects, tree_display_name,
};
