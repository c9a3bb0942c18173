mod task_filters;
mod task_form;
mod task_list;
mod task_list_row;

pub use task_filters::TaskFilters;
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
