use chrono::{
  DateTime,
  Utc
};
use chrono_tz::Tz;
use tasklet_core::task::{
  Task,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:         Vec<Task>,
  pub now:           DateTime<Utc>,
  pub timezone:      Option<Tz>,
  pub empty_message: String,
  pub on_toggle:     Callback<TaskId>,
  pub on_delete:     Callback<TaskId>,
  pub on_edit:
    Callback<(TaskId, String)>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  if props.tasks.is_empty() {
    return html! {
        <div class="todo-list">
            <p class="empty-message">{ props.empty_message.clone() }</p>
        </div>
    };
  }

  html! {
      <div class="todo-list">
          {
              for props.tasks.iter().cloned().map(|task| html! {
                  <TaskListRow
                      key={task.id().as_str().to_string()}
                      task={task.clone()}
                      now={props.now}
                      timezone={props.timezone}
                      on_toggle={props.on_toggle.clone()}
                      on_delete={props.on_delete.clone()}
                      on_edit={props.on_edit.clone()}
                  />
              })
          }
      </div>
  }
}
