//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client and the
//! list screen over real HTTP through `UreqTransport`. Validates that the
//! request building, envelope unwrapping and the screen's reload flow work
//! with the actual server.

use std::net::SocketAddr;

use todo_board::{
    ApiError, EditorError, ListPhase, Session, SortKey, StatusFilter, TodoClient, TodoCreate,
    Transport, UreqTransport, PAGE_SIZE,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn create(session: &mut Session<UreqTransport>, title: &str, description: &str) {
    session.open_create_form();
    let editor = session.list_mut().editor_mut().unwrap();
    editor.set_title(title);
    editor.set_description(description);
    session.submit_editor().unwrap();
}

#[test]
fn client_crud_lifecycle() {
    let addr = start_server();
    let client = TodoClient::new(&format!("http://{addr}"));
    let transport = UreqTransport::new();

    // Step 1: list — should be empty.
    let todos = transport
        .execute(&client.build_list_todos())
        .and_then(|r| client.parse_list_todos(r))
        .unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create.
    let input = TodoCreate {
        title: "Buy milk".to_string(),
        description: "2% milk, 1 gallon".to_string(),
        priority: 2,
        due_at: None,
    };
    let req = client.build_create_todo(&input).unwrap();
    let created = transport.execute(&req).and_then(|r| client.parse_create_todo(r)).unwrap();
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, "2% milk, 1 gallon");
    assert_eq!(created.priority, 2);
    assert!(!created.is_completed);
    assert!(created.due_at.is_none());

    // Step 3: get.
    let fetched = transport
        .execute(&client.build_get_todo(created.id))
        .and_then(|r| client.parse_get_todo(r))
        .unwrap();
    assert_eq!(fetched, created);

    // Step 4: toggle twice returns to the original flag.
    for expected in [true, false] {
        let req = client.build_toggle_todo(created.id, expected).unwrap();
        let toggled = transport.execute(&req).and_then(|r| client.parse_toggle_todo(r)).unwrap();
        assert_eq!(toggled.is_completed, expected);
    }

    // Step 5: delete, then every lookup is a 404.
    transport
        .execute(&client.build_delete_todo(created.id))
        .and_then(|r| client.parse_delete_todo(r))
        .unwrap();
    let err = transport
        .execute(&client.build_get_todo(created.id))
        .and_then(|r| client.parse_get_todo(r))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        format!("Código: 404\nMensaje: Todo {} not found", created.id)
    );
}

#[test]
fn screen_flow_against_live_server() {
    let addr = start_server();
    let mut session = Session::new(&format!("http://{addr}"), UreqTransport::new());

    session.load();
    assert_eq!(session.list().phase(), ListPhase::Loaded);
    assert!(session.list().todos().is_empty());

    // Creating through the editor reloads the list and closes the panel.
    create(&mut session, "Buy milk", "2% milk, 1 gallon");
    assert!(!session.list().is_form_open());
    let todos = session.list().todos();
    assert_eq!(todos.len(), 1);
    let milk = todos[0].clone();
    assert_eq!(milk.title, "Buy milk");
    assert_eq!(milk.description, "2% milk, 1 gallon");
    assert_eq!(milk.priority, 2);
    assert!(!milk.is_completed);
    assert!(milk.due_at.is_none());

    // Local validation never reaches the server.
    session.open_create_form();
    session.list_mut().editor_mut().unwrap().set_title("ab");
    assert!(matches!(session.submit_editor(), Err(EditorError::Invalid(_))));
    session.cancel_editor();
    session.reload();
    assert_eq!(session.list().todos().len(), 1);

    // Toggle twice.
    assert!(session.toggle(milk.id));
    assert!(session.list().todos()[0].is_completed);
    assert!(session.toggle(milk.id));
    assert!(!session.list().todos()[0].is_completed);

    // Edit replaces every field.
    assert!(session.edit(milk.id));
    {
        let editor = session.list_mut().editor_mut().unwrap();
        editor.set_title("Buy oat milk");
        editor.set_completed(true);
    }
    session.submit_editor().unwrap();
    let edited = &session.list().todos()[0];
    assert_eq!(edited.title, "Buy oat milk");
    assert!(edited.is_completed);

    // Enough items for a second page.
    for i in 0..PAGE_SIZE {
        create(&mut session, &format!("Chore {i}"), "Weekly housework");
    }
    assert_eq!(session.list().todos().len(), PAGE_SIZE + 1);
    assert_eq!(session.list().total_pages(), 2);

    session.list_mut().set_status_filter(StatusFilter::Completed);
    assert_eq!(session.list().filtered().len(), 1);
    session.list_mut().set_status_filter(StatusFilter::All);
    session.list_mut().set_sort_key(SortKey::Title);
    assert_eq!(session.list().visible()[0].title, "Buy oat milk");

    // Delete needs arming first.
    assert!(!session.confirm_delete(milk.id));
    assert!(session.request_delete(milk.id));
    assert!(session.confirm_delete(milk.id));
    assert_eq!(session.list().todos().len(), PAGE_SIZE);
    assert!(session.list().todos().iter().all(|t| t.id != milk.id));
}

#[test]
fn unreachable_server_surfaces_load_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut session = Session::new(&format!("http://{addr}"), UreqTransport::new());

    session.load();
    assert_eq!(session.list().phase(), ListPhase::Failed);
    assert_eq!(session.list().error(), Some("Error al cargar los TODOs"));
    assert!(!session.list().is_loading());

    let client = TodoClient::new(&format!("http://{addr}"));
    let err = UreqTransport::new().execute(&client.build_list_todos()).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.to_string().starts_with("Error: "));
}
