use std::env;
use std::io::{self, BufRead, Write};

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use staffdesk::config::Config;
use staffdesk::entity::RequestItem;
use staffdesk::error::AppError;
use staffdesk::handlers;
use staffdesk::router::{Route, Router};
use staffdesk::state::App;
use staffdesk::view::{DataKind, ViewId, ViewRegistry};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-help" || arg == "--help") {
        println!("Usage: staffdesk [OPTIONS]");
        println!("Options:");
        println!("  -config <path>  Path to configuration file (default: ./etc/staffdesk.toml)");
        println!("  -help, --help   Print this help message");
        return Ok(());
    }

    let config_path = args
        .iter()
        .skip_while(|arg| arg.as_str() != "-config")
        .nth(1)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "./etc/staffdesk.toml".to_string());

    // Load configuration first (before logging init)
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Could not load config file: {}, using defaults", e);
        Config::default()
    });

    // Initialize logging
    // Priority: RUST_LOG env var > config file > default "info"
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt().with_env_filter(env_filter).with_target(true).init();

    info!("Starting Staffdesk...");
    info!("Data directory: {}", config.data_dir.display());

    let mut app = App::bootstrap(config);
    let mut views = build_views();
    let mut router = Router::new();

    println!("Staffdesk. Type 'help' for commands, 'quit' to exit.");

    // Initial load
    router.navigate("/", &app, &mut views);

    // One command per line; events are handled strictly one at a time
    let stdin = io::stdin();
    loop {
        print!("{} > ", router.current_address());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if matches!(tokens[0], "quit" | "exit") {
            break;
        }

        dispatch(&tokens, &mut app, &mut router, &mut views);
    }

    info!("Staffdesk stopped");
    Ok(())
}

/// Register every page. Live-data pages declare the data kinds they mirror
/// so the registry can re-render them after an affecting mutation.
fn build_views() -> ViewRegistry {
    let mut views = ViewRegistry::new();
    views.register(ViewId::Home, &[DataKind::Session], Box::new(render_home));
    views.register_static(ViewId::Login);
    views.register_static(ViewId::Register);
    views.register_static(ViewId::VerifyEmail);
    views.register(
        ViewId::Profile,
        &[DataKind::Accounts, DataKind::Session],
        Box::new(render_profile),
    );
    views.register(
        ViewId::Accounts,
        &[DataKind::Accounts],
        Box::new(render_accounts),
    );
    views.register(
        ViewId::Departments,
        &[DataKind::Departments],
        Box::new(render_departments),
    );
    views.register(
        ViewId::Employees,
        &[DataKind::Employees, DataKind::Departments],
        Box::new(render_employees),
    );
    views.register(
        ViewId::Requests,
        &[DataKind::Requests, DataKind::Session],
        Box::new(render_requests),
    );
    views
}

/// Wrap up one mutating event: the handler has already committed, so either
/// follow its redirect (the settled view refreshes on activation) or
/// re-render the affected active view in place.
fn finish_mutation(
    redirect: Option<Route>,
    app: &mut App,
    router: &mut Router,
    views: &mut ViewRegistry,
) {
    let changed = app.take_changes();
    match redirect {
        Some(route) => {
            router.navigate(route.address(), app, views);
        }
        None => views.publish(app, &changed),
    }
}

fn dispatch(tokens: &[&str], app: &mut App, router: &mut Router, views: &mut ViewRegistry) {
    let outcome: Result<Option<Route>, AppError> = match tokens {
        ["help"] => {
            print_help();
            Ok(None)
        }
        ["go", address] => {
            router.navigate(address, app, views);
            Ok(None)
        }
        ["login", email, password] => handlers::auth::login(app, email, password).map(Some),
        ["logout"] => Ok(Some(handlers::auth::logout(app))),
        ["register", first, last, email, password] => handlers::auth::register(
            app,
            handlers::auth::RegisterInput {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .map(Some),
        ["verify", email] => handlers::auth::verify_email(app, email).map(|_| None),
        ["profile-edit", first, last] => {
            handlers::accounts::update_profile(app, first, last).map(|_| None)
        }
        ["passwd", old, new] => handlers::accounts::change_password(app, old, new).map(|_| None),
        ["account-add", first, last, email, password, role] => {
            match role.parse() {
                Ok(role) => handlers::accounts::create(
                    app,
                    handlers::accounts::NewAccountInput {
                        first_name: first.to_string(),
                        last_name: last.to_string(),
                        email: email.to_string(),
                        password: password.to_string(),
                        role,
                        verified: true,
                    },
                )
                .map(|_| None),
                Err(e) => Err(AppError::Validation(e)),
            }
        }
        ["account-edit", email, first, last, rest @ ..] => {
            let role = rest.first().map(|r| r.parse()).transpose();
            match role {
                Ok(role) => handlers::accounts::update(
                    app,
                    handlers::accounts::UpdateAccountInput {
                        email: email.to_string(),
                        first_name: first.to_string(),
                        last_name: last.to_string(),
                        role,
                        verified: rest.get(1).map(|v| *v == "yes"),
                    },
                )
                .map(|_| None),
                Err(e) => Err(AppError::Validation(e)),
            }
        }
        ["account-del", email] => handlers::accounts::delete(app, email).map(|_| None),
        ["account-reset", email, password] => {
            handlers::accounts::reset_password(app, email, password).map(|_| None)
        }
        ["dept-add", name, description @ ..] => handlers::departments::create(
            app,
            handlers::departments::DepartmentInput {
                name: name.to_string(),
                description: description.join(" "),
            },
        )
        .map(|_| None),
        ["dept-edit", id, name, description @ ..] => match id.parse() {
            Ok(id) => handlers::departments::update(
                app,
                id,
                handlers::departments::DepartmentInput {
                    name: name.to_string(),
                    description: description.join(" "),
                },
            )
            .map(|_| None),
            Err(_) => Err(AppError::Validation(
                "Department id must be a number".to_string(),
            )),
        },
        ["dept-del", id] => match id.parse() {
            Ok(id) => handlers::departments::delete(app, id).map(|_| None),
            Err(_) => Err(AppError::Validation(
                "Department id must be a number".to_string(),
            )),
        },
        ["emp-add", employee_id, email, position, dept_id, hire_date]
        | ["emp-edit", employee_id, email, position, dept_id, hire_date] => {
            match dept_id.parse() {
                Ok(dept_id) => {
                    let input = handlers::employees::EmployeeInput {
                        employee_id: employee_id.to_string(),
                        user_email: email.to_string(),
                        position: position.to_string(),
                        dept_id,
                        hire_date: hire_date.to_string(),
                    };
                    if tokens[0] == "emp-add" {
                        handlers::employees::create(app, input).map(|_| None)
                    } else {
                        handlers::employees::update(app, input).map(|_| None)
                    }
                }
                Err(_) => Err(AppError::Validation(
                    "Department id must be a number".to_string(),
                )),
            }
        }
        ["emp-del", employee_id] => handlers::employees::delete(app, employee_id).map(|_| None),
        ["req-add", kind, items @ ..] => match parse_items(items) {
            Ok(items) => handlers::requests::create(
                app,
                handlers::requests::RequestInput {
                    kind: kind.to_string(),
                    items,
                },
            )
            .map(|_| None),
            Err(e) => Err(AppError::Validation(e)),
        },
        _ => {
            println!("Unknown command, type 'help'.");
            Ok(None)
        }
    };

    match outcome {
        Ok(redirect) => finish_mutation(redirect, app, router, views),
        Err(e) => println!("! {}", e.user_message()),
    }
}

/// Parse `name:qty` item tokens
fn parse_items(tokens: &[&str]) -> Result<Vec<RequestItem>, String> {
    tokens
        .iter()
        .map(|token| {
            let (name, qty) = token
                .split_once(':')
                .ok_or_else(|| format!("Item '{}' must look like name:qty", token))?;
            let qty = qty
                .parse()
                .map_err(|_| format!("Quantity in '{}' must be a number", token))?;
            Ok(RequestItem {
                name: name.to_string(),
                qty,
            })
        })
        .collect()
}

fn print_help() {
    println!("Navigation:");
    println!("  go <address>        /  /login  /register  /verify-email  /profile");
    println!("                      /employees  /departments  /accounts  /requests");
    println!("Auth:");
    println!("  register <first> <last> <email> <password>");
    println!("  verify <email>");
    println!("  login <email> <password>   logout");
    println!("Profile:");
    println!("  profile-edit <first> <last>     passwd <old> <new>");
    println!("Admin:");
    println!("  account-add <first> <last> <email> <password> <user|admin>");
    println!("  account-edit <email> <first> <last> [user|admin] [yes|no]");
    println!("  account-del <email>             account-reset <email> <password>");
    println!("  dept-add <name> [description]   dept-edit <id> <name> [description]");
    println!("  dept-del <id>");
    println!("  emp-add <id> <email> <position> <dept-id> <YYYY-MM-DD>");
    println!("  emp-edit <id> <email> <position> <dept-id> <YYYY-MM-DD>");
    println!("  emp-del <id>");
    println!("Requests:");
    println!("  req-add <type> <name:qty> [name:qty ...]");
}

// ===== Page rendering (console view glue over the core) =====

fn render_home(app: &App) {
    println!("== Home ==");
    match app.session.current() {
        Some(account) => println!(
            "Welcome back, {} ({})",
            account.display_name(),
            account.role
        ),
        None => println!("Welcome to Staffdesk. Log in or register to continue."),
    }
}

fn render_profile(app: &App) {
    println!("== Profile ==");
    if let Some(account) = app.session.current() {
        println!("Name:     {}", account.display_name());
        println!("Email:    {}", account.email);
        println!("Role:     {}", account.role);
        println!("Verified: {}", account.verified);
    }
}

fn render_accounts(app: &App) {
    println!("== Accounts ==");
    println!(
        "{:<28} {:<24} {:<6} {}",
        "Email", "Name", "Role", "Verified"
    );
    for account in handlers::accounts::list(app) {
        println!(
            "{:<28} {:<24} {:<6} {}",
            account.email,
            account.display_name(),
            account.role,
            account.verified
        );
    }
}

fn render_departments(app: &App) {
    println!("== Departments ==");
    println!("{:<4} {:<24} {}", "Id", "Name", "Description");
    for department in handlers::departments::list(app) {
        println!(
            "{:<4} {:<24} {}",
            department.id, department.name, department.description
        );
    }
}

fn render_employees(app: &App) {
    println!("== Employees ==");
    println!(
        "{:<10} {:<28} {:<20} {:<20} {}",
        "Id", "Email", "Position", "Department", "Hired"
    );
    for employee in handlers::employees::list(app) {
        let dept_name = app
            .store
            .department_by_id(employee.dept_id)
            .map(|d| d.name.as_str())
            .unwrap_or("?");
        println!(
            "{:<10} {:<28} {:<20} {:<20} {}",
            employee.employee_id, employee.user_email, employee.position, dept_name,
            employee.hire_date
        );
    }
}

fn render_requests(app: &App) {
    println!("== Requests ==");
    println!(
        "{:<16} {:<12} {:<10} {:<28} {}",
        "Id", "Type", "Status", "Requested by", "Items"
    );
    for request in handlers::requests::list(app) {
        let items: Vec<String> = request
            .items
            .iter()
            .map(|i| format!("{} x{}", i.name, i.qty))
            .collect();
        println!(
            "{:<16} {:<12} {:<10} {:<28} {}",
            request.id,
            request.kind,
            request.status,
            request.employee_email,
            items.join(", ")
        );
    }
}
