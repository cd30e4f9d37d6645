mod common;

use common::*;
use serde_json::json;
use stacknav::{Dialog, DialogController, DialogState, Host, ModelMap, NodeKind};

static CONFIRM: NodeKind = NodeKind::new("Confirm");

#[test]
fn test_result_reaches_target_in_nested_host() {
    let mut app = Fixture::new();
    let outer = container();
    app.show(&outer);
    let target = page();
    let target_tag = tag_of(&target);
    app.controller.add_initial_child(&handle(&outer), handle(&target));

    let mut dialogs = DialogController::new();
    let root = app.root_handle();
    let tag = dialogs
        .show(&root, Dialog::new(&CONFIRM).with_target(&target_tag, 11))
        .unwrap();
    assert_eq!(app.root.borrow().dialogs(), &[tag.clone()]);

    dialogs.on_attach(&tag, &app.controller);
    dialogs.on_resume(&tag, &app.controller);
    dialogs.put_result_data(&tag, "answer", &"yes");
    let mut data = dialogs.dialog(&tag).unwrap().data().clone();
    data.insert("extra".to_string(), json!(3));
    dialogs.set_result(&tag, -1, data);

    dialogs.dismiss(&tag, &app.controller);

    let target = target.borrow();
    let results = &target.results;
    assert_eq!(results.len(), 1);
    let (request, result, data) = &results[0];
    assert_eq!((*request, *result), (11, -1));
    assert_eq!(data.get("answer"), Some(&json!("yes")));
    assert!(app.root.borrow().dialogs().is_empty());
}

#[test]
fn test_dismiss_before_attach_waits() {
    let mut app = Fixture::new();
    let target = page();
    let target_tag = app.show(&target);

    let mut dialogs = DialogController::new();
    let root = app.root_handle();
    let tag = dialogs
        .show(&root, Dialog::new(&CONFIRM).with_target(&target_tag, 5))
        .unwrap();
    dialogs.set_result(&tag, 0, ModelMap::new());

    dialogs.dismiss(&tag, &app.controller);
    assert_eq!(dialogs.state(&tag), Some(DialogState::Created));
    assert!(dialogs.is_dismiss_pending(&tag));

    dialogs.on_attach(&tag, &app.controller);
    assert!(dialogs.dialog(&tag).is_none());
    assert_eq!(target.borrow().results.len(), 1);
}

#[test]
fn test_result_for_popped_target_is_dropped() {
    let mut app = Fixture::new();
    let a_tag = app.show(&page());
    let target = page();
    let target_tag = app.show(&target);

    let mut dialogs = DialogController::new();
    let root = app.root_handle();
    let tag = dialogs
        .show(&root, Dialog::new(&CONFIRM).with_target(&target_tag, 5))
        .unwrap();
    dialogs.on_attach(&tag, &app.controller);
    dialogs.set_result(&tag, 1, ModelMap::new());

    assert!(app.controller.pop_to_tag(&root, &a_tag));
    assert_eq!(app.root.borrow().depth(), 1);

    dialogs.dismiss(&tag, &app.controller);
    assert!(target.borrow().results.is_empty());
    assert!(dialogs.is_empty());
}

#[test]
fn test_set_target_after_show() {
    let mut app = Fixture::new();
    let target = page();
    let target_tag = app.show(&target);

    let mut dialogs = DialogController::new();
    let root = app.root_handle();
    let tag = dialogs.show(&root, Dialog::new(&CONFIRM)).unwrap();
    dialogs.set_target(&tag, &target_tag, 9);
    dialogs.on_attach(&tag, &app.controller);
    dialogs.set_result(&tag, 2, ModelMap::new());
    dialogs.dismiss(&tag, &app.controller);

    let target = target.borrow();
    let results = &target.results;
    assert_eq!(results.len(), 1);
    assert_eq!((results[0].0, results[0].1), (9, 2));
}
