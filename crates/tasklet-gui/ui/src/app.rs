mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use tasklet_core::config::AppConfig;
use tasklet_core::filter::Filter;
use tasklet_core::storage::KeyValueStorage;
use tasklet_core::store::TaskStore;
use tasklet_core::task::TaskId;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo,
  use_mut_ref
};

use crate::components::{
  TaskFilters,
  TaskForm,
  TaskList
};

const APP_CONFIG_TOML: &str =
  include_str!("../assets/tasklet.toml");

type SharedStore = Rc<
  RefCell<
    TaskStore<Box<dyn KeyValueStorage>>
  >
>;

#[function_component(App)]
pub fn app() -> Html {
  let config = use_memo((), |_| {
    AppConfig::load_or_default(
      APP_CONFIG_TOML
    )
  });

  let store: SharedStore = {
    let prefix =
      config.storage.prefix.clone();
    use_mut_ref(move || {
      TaskStore::open(
        storage::open_browser_storage(),
        &prefix
      )
    })
  };

  let timezone = {
    let config = config.clone();
    *use_memo((), move |_| {
      config.timezone()
    })
  };

  let rerender = use_force_update();

  {
    let store = store.clone();
    use_effect_with((), move |_| {
      let subscription = store
        .borrow_mut()
        .subscribe(move |change| {
          tracing::debug!(
            ?change,
            "store changed"
          );
          rerender.force_update();
        });
      move || {
        store
          .borrow_mut()
          .unsubscribe(subscription);
      }
    });
  }

  let on_add = {
    let store = store.clone();
    Callback::from(move |text: String| {
      store.borrow_mut().add_task(&text);
    })
  };

  let on_toggle = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      store.borrow_mut().toggle_task(&id);
    })
  };

  let on_delete = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      store.borrow_mut().delete_task(&id);
    })
  };

  let on_edit = {
    let store = store.clone();
    Callback::from(
      move |(id, text): (TaskId, String)| {
        store
          .borrow_mut()
          .edit_task(&id, &text);
      }
    )
  };

  let on_filter_change = {
    let store = store.clone();
    Callback::from(move |filter: Filter| {
      store
        .borrow_mut()
        .set_filter(filter);
    })
  };

  let (tasks, filter) = {
    let store = store.borrow();
    (
      store.derived_view(),
      store.filter()
    )
  };

  html! {
      <div class="app">
          <div class="todo-list-container">
              <h1>{ config.title.clone() }</h1>
              <TaskForm
                  placeholder={config.form.placeholder.clone()}
                  on_add={on_add}
              />
              <TaskFilters filter={filter} on_filter_change={on_filter_change} />
              <TaskList
                  tasks={tasks}
                  now={Utc::now()}
                  timezone={timezone}
                  empty_message={config.list.empty_message.clone()}
                  on_toggle={on_toggle}
                  on_delete={on_delete}
                  on_edit={on_edit}
              />
          </div>
      </div>
  }
}
