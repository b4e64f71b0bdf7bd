//! Interactive terminal host for the todo client core.
//!
//! The core never does I/O: every mutation hands back `HttpCall`s, this
//! binary executes them with ureq and feeds the outcomes straight back in,
//! then redraws the snapshot after each command.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use clap::Parser;
use todoapp_core::{
    EntryId, Filter, HttpCall, HttpMethod, HttpRequest, HttpResponse, TodoClient,
    TodoListController, TransportError, ViewState,
};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "todoapp", about = "Todo list client for a remote REST store")]
struct Args {
    /// Base URL of the todo API.
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    /// User whose todos are managed.
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

const USAGE: &str = "\
commands:
  add <title>       create a todo
  toggle <n>        flip row n between active and completed
  rm <n>            delete row n
  all | active | completed
                    choose which rows are shown
  toggle-all        flip the whole list at once
  clear             delete every completed todo
  reload            refetch the list from the server
  ls                redraw the list
  quit";

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    tracing::debug!(base_url = %args.base_url, user_id = args.user_id, "starting");
    let mut controller = TodoListController::new(TodoClient::new(&args.base_url), args.user_id);

    let call = controller.load();
    settle(&mut controller, vec![call]);
    render(&controller.snapshot(Instant::now()));
    println!("{USAGE}");

    print_prompt()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        match commands::parse(&line) {
            Err(message) => println!("{message}"),
            Ok(Command::Quit) => break,
            Ok(command) => dispatch(&mut controller, command),
        }
        render(&controller.snapshot(Instant::now()));
        print_prompt()?;
    }
    Ok(())
}

fn dispatch(controller: &mut TodoListController, command: Command) {
    let now = Instant::now();
    match command {
        Command::Add(title) => {
            if let Some(call) = controller.create(&title, now) {
                settle(controller, vec![call]);
            }
        }
        Command::Toggle(row) => match nth_visible(controller, row) {
            Some((id, completed)) => {
                if let Some(call) = controller.toggle_one(id, !completed) {
                    settle(controller, vec![call]);
                } else {
                    println!("row {row} is still syncing");
                }
            }
            None => println!("no row {row}"),
        },
        Command::Remove(row) => match nth_visible(controller, row) {
            Some((id, _)) => {
                if let Some(call) = controller.remove_one(id) {
                    settle(controller, vec![call]);
                } else {
                    println!("row {row} is still syncing");
                }
            }
            None => println!("no row {row}"),
        },
        Command::SetFilter(filter) => controller.set_filter(filter),
        Command::ToggleAll => {
            let calls = controller.toggle_all();
            settle(controller, calls);
        }
        Command::ClearCompleted => {
            let calls = controller.clear_completed();
            if calls.is_empty() {
                println!("nothing completed to clear");
            } else {
                settle(controller, calls);
            }
        }
        Command::Reload => {
            let call = controller.load();
            settle(controller, vec![call]);
        }
        Command::List => {}
        // Quit is intercepted by the input loop.
        Command::Quit => {}
    }
}

/// Execute every call with ureq and feed its outcome back in.
fn settle(controller: &mut TodoListController, calls: Vec<HttpCall>) {
    for call in calls {
        let outcome = execute(call.request);
        // A line-oriented host has no input widget, so the focus and
        // clear-input effects have nothing to act on here.
        let _ = controller.complete(call.op, outcome, Instant::now());
    }
}

/// Execute an `HttpRequest` with ureq, returning non-2xx statuses as data.
fn execute(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(&req.path).send_empty(),
    };

    let mut response = result.map_err(|e| TransportError(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

/// The entry shown at 1-based `row` under the current filter.
fn nth_visible(controller: &TodoListController, row: usize) -> Option<(EntryId, bool)> {
    controller
        .visible_todos()
        .get(row.checked_sub(1)?)
        .map(|entry| (entry.id, entry.completed))
}

fn render(view: &ViewState) {
    if let Some(error) = &view.error {
        println!("! {error}");
    }
    if view.total == 0 {
        println!("  (no todos yet)");
        return;
    }
    for (index, todo) in view.todos.iter().enumerate() {
        let mark = if todo.completed { 'x' } else { ' ' };
        let state = if todo.pending { "  (syncing)" } else { "" };
        println!("{:>3}. [{mark}] {}{state}", index + 1, todo.title);
    }
    let noun = if view.remaining == 1 { "item" } else { "items" };
    let busy = if view.busy { "  [busy]" } else { "" };
    println!(
        "  {} {noun} left | showing {}{busy}",
        view.remaining,
        filter_label(view.filter)
    );
}

fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "all",
        Filter::Active => "active",
        Filter::Completed => "completed",
    }
}

fn print_prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
