use super::*;

const PAGE: &str = r#"<html><body>
    <div id="thread">
        <h1>Comment bien débuter en Rust ?</h1>
        <p id="answer">Commencez par le livre.</p>
        <div id="box"><textarea id="reply"></textarea></div>
        <div id="rich" contenteditable="true"><p id="inner">brouillon</p></div>
        <div id="later"></div>
    </div>
</body></html>"#;

fn controller() -> Arc<AffordanceController> {
    let doc = Document::parse(PAGE);
    Arc::new(AffordanceController::new(Arc::new(Mutex::new(doc)), ControllerConfig::default()).unwrap())
}

fn by_id(controller: &AffordanceController, id: &str) -> NodeId {
    controller.document().lock().select(&format!("#{id}")).unwrap()[0]
}

fn count(controller: &AffordanceController, selector: &str) -> usize {
    controller.document().lock().select(selector).unwrap().len()
}

fn shortcut() -> PageEvent {
    PageEvent::KeyDown {
        key: "G".to_string(),
        ctrl: true,
        shift: true,
    }
}

#[test]
fn test_icon_click_activates_field() {
    let controller = controller();
    assert_eq!(controller.scan().unwrap().len(), 2);

    let reply = by_id(&controller, "reply");
    let icon = controller.document().lock().select(".ai-gen-icon").unwrap()[0];
    let activation = controller.handle(PageEvent::Click { target: icon }).unwrap();
    assert_eq!(
        activation,
        Some(Activation {
            field: reply,
            source: ActivationSource::Icon
        })
    );

    let answer = by_id(&controller, "answer");
    assert_eq!(controller.handle(PageEvent::Click { target: answer }).unwrap(), None);
}

#[tokio::test]
async fn test_shortcut_targets_last_focused_field() {
    let controller = controller();
    controller.scan().unwrap();

    let inner = by_id(&controller, "inner");
    controller.handle(PageEvent::FocusIn { target: inner }).unwrap();
    let rich = by_id(&controller, "rich");
    assert_eq!(controller.last_focused(), Some(rich));

    let activation = controller.handle(shortcut()).unwrap().unwrap();
    assert_eq!(activation.field, rich);
    assert_eq!(activation.source, ActivationSource::Shortcut);

    let plain = PageEvent::KeyDown {
        key: "g".to_string(),
        ctrl: true,
        shift: false,
    };
    assert_eq!(controller.handle(plain).unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_shortcut_without_focus_shows_transient_toast() {
    let controller = controller();

    assert_eq!(controller.handle(shortcut()).unwrap(), None);
    let toast = controller.document().lock().select(".ai-toast").unwrap()[0];
    assert_eq!(
        controller.document().lock().readable_text(toast),
        "Veuillez d'abord cliquer dans un champ de texte"
    );

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(count(&controller, ".ai-toast"), 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(count(&controller, ".ai-toast"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_removed_focused_field_falls_back_to_toast() {
    let controller = controller();
    let reply = by_id(&controller, "reply");
    controller.handle(PageEvent::FocusIn { target: reply }).unwrap();
    controller.document().lock().remove(reply).unwrap();

    assert_eq!(controller.handle(shortcut()).unwrap(), None);
    assert_eq!(controller.last_focused(), None);
    assert_eq!(count(&controller, ".ai-toast"), 1);
}

#[test]
fn test_context_menu_on_editable_field() {
    let controller = controller();
    let reply = by_id(&controller, "reply");
    let answer = by_id(&controller, "answer");

    controller.handle(PageEvent::ContextMenu { target: answer }).unwrap();
    assert_eq!(count(&controller, ".ai-context-menu"), 0);

    controller.handle(PageEvent::ContextMenu { target: reply }).unwrap();
    let item = controller.document().lock().select(".ai-context-menu-item").unwrap()[0];
    let activation = controller.handle(PageEvent::Click { target: item }).unwrap().unwrap();
    assert_eq!(activation.field, reply);
    assert_eq!(activation.source, ActivationSource::ContextMenu);
    assert_eq!(count(&controller, ".ai-context-menu"), 0);
}

#[test]
fn test_click_elsewhere_dismisses_context_menu() {
    let controller = controller();
    let reply = by_id(&controller, "reply");
    controller.handle(PageEvent::ContextMenu { target: reply }).unwrap();

    let answer = by_id(&controller, "answer");
    assert_eq!(controller.handle(PageEvent::Click { target: answer }).unwrap(), None);
    assert_eq!(count(&controller, ".ai-context-menu"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hover_button_follows_pointer() {
    let controller = controller();
    let reply = by_id(&controller, "reply");
    controller
        .document()
        .lock()
        .set_bounding_box(reply, BoundingBox::new(10.0, 20.0, 200.0, 50.0))
        .unwrap();

    controller.handle(PageEvent::PointerEnter { target: reply }).unwrap();
    let button = controller.document().lock().select(".ai-hover-btn").unwrap()[0];
    assert_eq!(
        controller.document().lock().bounding_box(button),
        BoundingBox::new(186.0, 20.0, 24.0, 24.0)
    );

    // Moving from the field onto the button keeps it.
    controller.handle(PageEvent::PointerLeave { target: reply }).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.handle(PageEvent::PointerEnter { target: button }).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(count(&controller, ".ai-hover-btn"), 1);

    controller.handle(PageEvent::PointerLeave { target: button }).unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(count(&controller, ".ai-hover-btn"), 1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count(&controller, ".ai-hover-btn"), 0);
}

#[test]
fn test_hover_button_click_activates_field() {
    let controller = controller();
    let rich = by_id(&controller, "rich");
    controller.handle(PageEvent::PointerEnter { target: rich }).unwrap();

    let button = controller.document().lock().select(".ai-hover-btn").unwrap()[0];
    let activation = controller.handle(PageEvent::Click { target: button }).unwrap().unwrap();
    assert_eq!(activation.field, rich);
    assert_eq!(activation.source, ActivationSource::HoverButton);
    assert_eq!(count(&controller, ".ai-hover-btn"), 0);
}

#[test]
fn test_open_modal_prefills_context() {
    let controller = controller();
    let reply = by_id(&controller, "reply");

    let modal = controller.open_modal(reply, ToneId::Friendly, LanguageId::Fr).unwrap();
    assert_eq!(
        modal.context(),
        "Contexte: Comment bien débuter en Rust ?\n\nContexte: Commencez par le livre."
    );
    assert_eq!(count(&controller, ".ai-modal"), 1);

    // The modal's own textareas never get an icon.
    controller.scan().unwrap();
    assert_eq!(controller.fields().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_scan_picks_up_new_fields_after_debounce() {
    let controller = controller();
    let handle = Arc::clone(&controller).spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(count(&controller, ".ai-gen-icon"), 2);

    {
        let mut doc = controller.document().lock();
        let later = doc.select("#later").unwrap()[0];
        let textarea = doc.create_element("textarea");
        doc.append_child(later, textarea).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count(&controller, ".ai-gen-icon"), 2);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(count(&controller, ".ai-gen-icon"), 3);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_poll_catches_changes_without_mutations() {
    let controller = controller();
    let handle = Arc::clone(&controller).spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let later = by_id(&controller, "later");
    controller
        .document()
        .lock()
        .set_attr(later, "contenteditable", "true")
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(count(&controller, ".ai-gen-icon"), 2);
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(count(&controller, ".ai-gen-icon"), 3);

    handle.stop().await;
}
