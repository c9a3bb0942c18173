use tasklet_core::view::TaskForm as FormState;
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
pub struct TaskFormProps {
  pub placeholder: String,
  pub on_add:      Callback<String>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let form = use_state(FormState::default);

  let on_input = {
    let form = form.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        let mut next = (*form).clone();
        next.set_text(input.value());
        form.set(next);
      }
    )
  };

  let on_clear = {
    let form = form.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        let mut next = (*form).clone();
        next.clear();
        form.set(next);
      }
    )
  };

  let on_submit = {
    let form = form.clone();
    let on_add = props.on_add.clone();
    Callback::from(
      move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        let mut next = (*form).clone();
        if let Some(text) = next.submit() {
          on_add.emit(text);
          form.set(next);
        }
      }
    )
  };

  html! {
      <form class="todo-form" onsubmit={on_submit}>
          <div class="form-group">
              <input
                  type="text"
                  placeholder={props.placeholder.clone()}
                  value={form.text().to_string()}
                  oninput={on_input}
              />
              {
                  if form.shows_clear() {
                      html! {
                          <button
                              type="button"
                              class="clear-button"
                              aria-label="Clear input"
                              onclick={on_clear}
                          >
                              { "✕" }
                          </button>
                      }
                  } else {
                      html! {}
                  }
              }
          </div>
          <button type="submit" disabled={!form.is_valid()}>{ "Add" }</button>
      </form>
  }
}
