use tasklet_core::filter::Filter;
use tasklet_core::view::filter_buttons;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskFiltersProps {
  pub filter:           Filter,
  pub on_filter_change: Callback<Filter>
}

#[function_component(TaskFilters)]
pub fn task_filters(
  props: &TaskFiltersProps
) -> Html {
  html! {
      <div class="todo-filters">
          <div class="filter-group">
              {
                  for filter_buttons(props.filter).into_iter().map(|button| {
                      let on_filter_change = props.on_filter_change.clone();
                      let filter = button.filter;
                      html! {
                          <button
                              key={filter.as_key()}
                              class={if button.active { "active" } else { "" }}
                              onclick={move |_| on_filter_change.emit(filter)}
                          >
                              { button.label }
                          </button>
                      }
                  })
              }
          </div>
      </div>
  }
}
