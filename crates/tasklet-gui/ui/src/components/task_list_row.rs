use chrono::{
  DateTime,
  Local,
  Utc
};
use chrono_tz::Tz;
use tasklet_core::datetime::created_label;
use tasklet_core::task::{
  Task,
  TaskId
};
use tasklet_core::view::{
  EditOutcome,
  EditSession
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub task:      Task,
  pub now:       DateTime<Utc>,
  pub timezone:  Option<Tz>,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>,
  pub on_edit:
    Callback<(TaskId, String)>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let session =
    use_state(EditSession::default);
  let id = props.task.id().clone();

  // one place that turns a session
  // transition into a store call
  let apply = {
    let session = session.clone();
    let on_edit = props.on_edit.clone();
    let id = id.clone();
    Callback::from(
      move |(next, outcome): (
        EditSession,
        EditOutcome
      )| {
        if let EditOutcome::Committed(
          text
        ) = outcome
        {
          on_edit.emit((id.clone(), text));
        }
        session.set(next);
      }
    )
  };

  if let Some(buffer) = session.buffer() {
    let on_input = {
      let session = session.clone();
      Callback::from(
        move |e: web_sys::InputEvent| {
          let input: web_sys::HtmlInputElement =
            e.target_unchecked_into();
          let mut next = (*session).clone();
          next.set_text(input.value());
          session.set(next);
        }
      )
    };

    let on_keydown = {
      let session = session.clone();
      let apply = apply.clone();
      Callback::from(
        move |e: web_sys::KeyboardEvent| {
          let mut next = (*session).clone();
          let outcome =
            next.handle_key(&e.key());
          if outcome != EditOutcome::Ignored
          {
            apply.emit((next, outcome));
          }
        }
      )
    };

    let on_save = {
      let session = session.clone();
      let apply = apply.clone();
      Callback::from(
        move |_: yew::MouseEvent| {
          let mut next = (*session).clone();
          let outcome = next.commit();
          apply.emit((next, outcome));
        }
      )
    };

    let on_cancel = {
      let session = session.clone();
      Callback::from(
        move |_: yew::MouseEvent| {
          let mut next = (*session).clone();
          let outcome = next.cancel();
          apply.emit((next, outcome));
        }
      )
    };

    return html! {
        <div class="todo-item editing">
            <div class="todo-edit">
                <input
                    type="text"
                    value={buffer.to_string()}
                    autofocus=true
                    oninput={on_input}
                    onkeydown={on_keydown}
                />
                <div class="actions">
                    <button onclick={on_save} disabled={!session.is_valid()}>{ "Save" }</button>
                    <button onclick={on_cancel}>{ "Cancel" }</button>
                </div>
            </div>
        </div>
    };
  }

  let completed =
    props.task.is_completed();
  let class = if completed {
    "todo-item completed"
  } else {
    "todo-item"
  };
  let date_label = match props.timezone {
    | Some(tz) => created_label(
      props.task.created_at(),
      props.now,
      &tz
    ),
    | None => created_label(
      props.task.created_at(),
      props.now,
      &Local
    )
  };

  let on_toggle = {
    let on_toggle = props.on_toggle.clone();
    let id = id.clone();
    Callback::from(
      move |_: web_sys::Event| {
        on_toggle.emit(id.clone());
      }
    )
  };

  let on_begin_edit = {
    let session = session.clone();
    let task = props.task.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        let mut next = (*session).clone();
        if next.begin(&task) {
          session.set(next);
        }
      }
    )
  };

  let on_delete = {
    let on_delete = props.on_delete.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        on_delete.emit(id.clone());
      }
    )
  };

  html! {
      <div class={class}>
          <div class="todo-content">
              <input type="checkbox" checked={completed} onchange={on_toggle} />
              <span class="todo-text">{ props.task.text() }</span>
              <span class="date">{ date_label }</span>
          </div>
          <div class="actions">
              <button
                  onclick={on_begin_edit}
                  disabled={!EditSession::can_begin(&props.task)}
              >
                  { "Edit" }
              </button>
              <button
                  class="delete-button"
                  aria-label="Delete task"
                  onclick={on_delete}
              >
                  { "✕" }
              </button>
          </div>
      </div>
  }
}
