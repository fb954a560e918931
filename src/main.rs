use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rental_hub::config::ClientConfig;
use rental_hub::dashboard::{self, AmountSort, BookingQuery, UserQuery};
use rental_hub::error::ClientError;
use rental_hub::media::UploadBatch;
use rental_hub::models::{
    ApprovalStatus, Booking, BookingStatus, PaymentMethod, Property, Role, User,
};
use rental_hub::resources::{
    AdminPropertyQuery, AdminUserQuery, BrowseQuery, Credentials, NewVisit, Registration,
};
use rental_hub::session::{Route, OWNER_ACTIVE_TAB, TENANT_ACTIVE_TAB};
use rental_hub::workflow::{BookingWorkflow, PaymentOutcome, PaymentWorkflow, SimulatedUpiProcessor};
use rental_hub::RentalHub;

#[derive(Debug, Parser)]
#[command(name = "rental-hub", version, about = "Rental marketplace client")]
struct Cli {
    /// Backend base URL, overrides RENTAL_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Session file, overrides RENTAL_SESSION_FILE
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Debug logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        email: String,
        password: String,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
    AdminLogin {
        email: String,
        password: String,
    },
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// Email a one-time password
    ForgotPassword {
        email: String,
    },
    /// Log in with the emailed one-time password
    VerifyOtp {
        email: String,
        otp: String,
    },
    Logout,
    Whoami,
    /// Show where the route guard sends the current session for a path
    Route {
        path: String,
    },
    /// Browse approved, available listings
    Properties(BrowseArgs),
    /// Check availability and book a listing
    Book {
        property_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Pay a booking in full
    Pay {
        booking_id: String,
        #[arg(long, default_value = "UPI", value_parser = parse_enum::<PaymentMethod>)]
        method: PaymentMethod,
    },
    Bookings,
    CancelBooking {
        booking_id: String,
        reason: String,
    },
    Visits,
    ScheduleVisit {
        property_id: String,
        date: NaiveDate,
        time_slot: String,
    },
    CancelVisit {
        visit_id: String,
        reason: String,
    },
    /// Owner booking table with client-side search, filter and sort
    OwnerBookings {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_parser = parse_enum::<BookingStatus>)]
        status: Option<BookingStatus>,
        #[arg(long, value_parser = parse_sort)]
        sort: Option<AmountSort>,
    },
    SetBookingStatus {
        booking_id: String,
        #[arg(value_parser = parse_enum::<BookingStatus>)]
        status: BookingStatus,
    },
    /// Owner revenue per day from successful payments
    Revenue {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    AdminProperties {
        #[arg(long, value_parser = parse_enum::<ApprovalStatus>)]
        approval: Option<ApprovalStatus>,
    },
    ApproveProperty {
        property_id: String,
    },
    RejectProperty {
        property_id: String,
        reason: String,
    },
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        blocked: Option<bool>,
    },
    BlockUser {
        user_id: String,
    },
    UnblockUser {
        user_id: String,
    },
    UploadImages {
        property_id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    Wishlist,
    ToggleWishlist {
        property_id: String,
    },
    Notifications,
    /// Show plans and the current subscription, or buy a plan
    Subscription {
        #[arg(long)]
        purchase: Option<String>,
    },
    /// Landing data of the signed-in user's dashboard
    Dashboard,
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    bedrooms: Option<u32>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long, default_value_t = 1)]
    page: u32,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::parse(raw).ok_or_else(|| format!("unknown role {raw:?}, expected admin, owner or tenant"))
}

/// Parses a wire-format value such as `confirmed` or `UPI`.
fn parse_enum<T: DeserializeOwned + Serialize>(raw: &str) -> Result<T, String> {
    let value: T = serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|err| err.to_string())?;
    // Catch-all variants accept any string; only real values are useful on the command line.
    match serde_json::to_value(&value) {
        Ok(serde_json::Value::String(wire)) if wire == "other" => {
            Err(format!("invalid value {raw:?}"))
        }
        _ => Ok(value),
    }
}

fn parse_sort(raw: &str) -> Result<AmountSort, String> {
    match raw {
        "low" | "low-high" | "asc" => Ok(AmountSort::LowToHigh),
        "high" | "high-low" | "desc" => Ok(AmountSort::HighToLow),
        other => Err(format!("unknown sort {other:?}, expected low or high")),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "rental_hub=debug" } else { "rental_hub=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .downcast_ref::<ClientError>()
                .map(ClientError::user_message)
                .unwrap_or_else(|| format!("{err:#}"));
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::load().context("invalid configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let hub = RentalHub::connect(config).await?;
    let res = &hub.resources;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Login {
            email,
            password,
            role,
        } => {
            let session = res
                .auth
                .login(&Credentials {
                    email,
                    password,
                    role,
                })
                .await?;
            print_landing(&session.user);
        }
        Command::AdminLogin { email, password } => {
            let session = res.auth.admin_login(&email, &password).await?;
            print_landing(&session.user);
        }
        Command::Register {
            full_name,
            email,
            password,
            phone,
            role,
        } => {
            res.auth
                .register(&Registration {
                    full_name,
                    email,
                    password,
                    phone,
                    role_name: role,
                })
                .await?;
            println!("Registered. Continue at {}", Route::Login);
        }
        Command::ForgotPassword { email } => {
            println!("{}", res.auth.forgot_password(&email).await?);
        }
        Command::VerifyOtp { email, otp } => {
            let session = res.auth.verify_otp(&email, &otp).await?;
            print_landing(&session.user);
        }
        Command::Logout => {
            res.auth.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match hub.session.current() {
            Some(session) => {
                println!(
                    "{} <{}> ({})",
                    session.user.full_name,
                    session.user.email,
                    session.role().map(|r| r.as_str()).unwrap_or("no role")
                );
            }
            None => println!("Not logged in"),
        },
        Command::Route { path } => {
            let route = Route::parse(&path);
            let session = hub.session.current();
            match rental_hub::session::check(&route, session.as_ref()) {
                rental_hub::session::GuardDecision::Allow => println!("allow {route}"),
                rental_hub::session::GuardDecision::Redirect(target) => {
                    println!("redirect {route} -> {target}")
                }
            }
        }
        Command::Properties(args) => {
            hub.enter(&Route::TenantDashboard)?;
            let query = BrowseQuery {
                search: args.search,
                city: args.city,
                bedrooms: args.bedrooms,
                min_price: args.min_price,
                max_price: args.max_price,
                page: args.page,
                ..BrowseQuery::default()
            };
            let listings = res.properties.browse(&query).await?;
            print_properties(&listings);
        }
        Command::Book {
            property_id,
            start,
            end,
        } => {
            hub.enter(&Route::TenantDashboard)?;
            let property = res.properties.tenant_get(&property_id).await?;
            let mut workflow = BookingWorkflow::for_property(res.bookings.clone(), &property);
            let quote = workflow.select_dates(Some(start), Some(end), today)?;
            println!(
                "{}: {} day(s) x {} = {}",
                property.title, quote.days, property.price, quote.total_amount
            );

            if !workflow.check_availability().await? {
                println!("Not available for the selected dates");
                return Ok(());
            }

            let bookings = res.bookings.clone();
            let booking = workflow
                .confirm(|| async move {
                    bookings.mine().await.map(|mine| {
                        info!(count = mine.len(), "bookings refreshed");
                    })
                })
                .await?;
            match booking {
                Some(booking) => println!("Booked {} ({})", booking.id, booking.status.as_str()),
                None => println!("Booking request sent"),
            }
        }
        Command::Pay { booking_id, method } => {
            hub.enter(&Route::TenantDashboard)?;
            let booking = res.bookings.get_mine(&booking_id).await?;
            let processor = SimulatedUpiProcessor::new(hub.config.payment_delay);
            let workflow = PaymentWorkflow::new(res.payments.clone(), processor);
            let bookings = res.bookings.clone();
            let outcome = workflow
                .pay(&booking, method, || async move {
                    bookings.mine().await.map(|mine| {
                        info!(count = mine.len(), "bookings refreshed");
                    })
                })
                .await?;
            match outcome {
                PaymentOutcome::Succeeded { payment_id, .. } => {
                    println!("Payment {payment_id} succeeded, {} paid", booking.total_amount)
                }
                PaymentOutcome::Failed { payment_id, .. } => {
                    println!("Payment {payment_id} failed")
                }
            }
        }
        Command::Bookings => {
            hub.enter(&Route::TenantDashboard)?;
            print_bookings(&res.bookings.mine().await?);
        }
        Command::CancelBooking { booking_id, reason } => {
            hub.enter(&Route::TenantDashboard)?;
            print_bookings(&res.bookings.cancel_and_refresh(&booking_id, &reason).await?);
        }
        Command::Visits => {
            hub.enter(&Route::TenantDashboard)?;
            for visit in res.visits.mine().await? {
                println!(
                    "{}  {}  {}  {}",
                    visit.id,
                    visit
                        .visit_date
                        .map(|at| at.date_naive().to_string())
                        .unwrap_or_default(),
                    visit.time_slot.as_deref().unwrap_or("-"),
                    visit.status.as_str()
                );
            }
        }
        Command::ScheduleVisit {
            property_id,
            date,
            time_slot,
        } => {
            hub.enter(&Route::TenantDashboard)?;
            let visit = NewVisit {
                property_id,
                visit_date: date,
                time_slot,
            };
            res.visits.schedule(&visit, today).await?;
            println!("Visit requested for {date}");
        }
        Command::CancelVisit { visit_id, reason } => {
            hub.enter(&Route::TenantDashboard)?;
            let remaining = res.visits.cancel_and_refresh(&visit_id, &reason).await?;
            println!("Visit cancelled, {} visit(s) listed", remaining.len());
        }
        Command::OwnerBookings {
            search,
            status,
            sort,
        } => {
            hub.enter(&Route::OwnerDashboard)?;
            hub.session.set_preference(OWNER_ACTIVE_TAB, "bookings").await?;
            let all = res.bookings.owner_bookings().await?;
            let stats = dashboard::BookingStats::of(&all);
            println!(
                "total {}  pending {}  confirmed {}  cancelled {}",
                stats.total, stats.pending, stats.confirmed, stats.cancelled
            );
            let query = BookingQuery {
                search,
                status,
                sort: sort.unwrap_or_default(),
            };
            print_bookings(&query.apply(&all));
        }
        Command::SetBookingStatus { booking_id, status } => {
            hub.enter(&Route::OwnerDashboard)?;
            let refreshed = res
                .bookings
                .set_owner_status_and_refresh(&booking_id, status)
                .await?;
            print_bookings(&refreshed);
        }
        Command::Revenue { from, to } => {
            hub.enter(&Route::OwnerDashboard)?;
            let analytics = dashboard::owner_analytics(res, from, to).await?;
            for day in &analytics.revenue.daily {
                println!("{}  {:>12.2}", day.day, day.amount);
            }
            println!("total       {:>12.2}", analytics.revenue.total);
        }
        Command::AdminProperties { approval } => {
            hub.enter(&Route::AdminDashboard)?;
            let query = AdminPropertyQuery {
                approval_status: approval,
                search: None,
            };
            print_properties(&res.properties.admin_all(&query).await?);
        }
        Command::ApproveProperty { property_id } => {
            hub.enter(&Route::AdminDashboard)?;
            let refreshed = res
                .properties
                .approve_and_refresh(&property_id, &AdminPropertyQuery::default())
                .await?;
            print_properties(&refreshed);
        }
        Command::RejectProperty {
            property_id,
            reason,
        } => {
            hub.enter(&Route::AdminDashboard)?;
            let refreshed = res
                .properties
                .reject_and_refresh(&property_id, &reason, &AdminPropertyQuery::default())
                .await?;
            print_properties(&refreshed);
        }
        Command::Users { search, blocked } => {
            hub.enter(&Route::AdminDashboard)?;
            let users = res.users.list(&AdminUserQuery::default()).await?;
            print_users(&UserQuery { search, blocked }.apply(&users));
        }
        Command::BlockUser { user_id } => {
            hub.enter(&Route::AdminDashboard)?;
            print_users(
                &res.users
                    .block_and_refresh(&user_id, &AdminUserQuery::default())
                    .await?,
            );
        }
        Command::UnblockUser { user_id } => {
            hub.enter(&Route::AdminDashboard)?;
            print_users(
                &res.users
                    .unblock_and_refresh(&user_id, &AdminUserQuery::default())
                    .await?,
            );
        }
        Command::UploadImages { property_id, files } => {
            hub.enter(&Route::OwnerDashboard)?;
            let mut batch = UploadBatch::images();
            for file in &files {
                if !batch.add_path(file).await? {
                    println!("skipping {} (not an image)", file.display());
                }
            }
            let count = batch.len();
            res.properties.upload_images(&property_id, batch).await?;
            println!("Uploaded {count} image(s)");
        }
        Command::Wishlist => {
            hub.enter(&Route::TenantDashboard)?;
            for entry in res.wishlist.list().await? {
                let title = entry
                    .property
                    .populated()
                    .map(|property| property.title.as_str())
                    .unwrap_or("-");
                println!("{}  {}", entry.property.id(), title);
            }
        }
        Command::ToggleWishlist { property_id } => {
            hub.enter(&Route::TenantDashboard)?;
            let property = res.properties.tenant_get(&property_id).await?;
            let wishlisted = res.wishlist.toggle(&property).await?;
            println!(
                "{} {}",
                property.title,
                if wishlisted { "added to wishlist" } else { "removed from wishlist" }
            );
        }
        Command::Notifications => {
            hub.enter(&Route::TenantDashboard)?;
            for notification in res.notifications.mine().await? {
                let marker = if notification.is_read { ' ' } else { '*' };
                println!(
                    "{marker} {}  {}",
                    notification.title.as_deref().unwrap_or(""),
                    notification.message
                );
            }
        }
        Command::Subscription { purchase } => {
            hub.enter(&Route::TenantDashboard)?;
            if let Some(plan_id) = purchase {
                res.subscriptions.purchase(&plan_id).await?;
            }
            for plan in res.subscriptions.tenant_plans().await? {
                println!("{}  {}  {}", plan.id, plan.name, plan.price);
            }
            match res.subscriptions.tenant_current().await? {
                Some(current) => println!("current: {} ({:?})", current.id, current.status),
                None => println!("current: none"),
            }
        }
        Command::Dashboard => {
            let session = hub.session.require()?;
            match session.role() {
                Some(Role::Tenant) => {
                    hub.session.set_preference(TENANT_ACTIVE_TAB, "overview").await?;
                    print_json(&dashboard::tenant_home(res).await)?;
                }
                Some(Role::Owner) => {
                    hub.session.set_preference(OWNER_ACTIVE_TAB, "overview").await?;
                    print_json(&dashboard::owner_analytics(res, None, None).await?)?;
                }
                Some(Role::Admin) => print_json(&dashboard::admin_overview(res).await?)?,
                None => anyhow::bail!("account has no role"),
            }
        }
    }

    Ok(())
}

fn print_landing(user: &User) {
    let landing = user
        .role
        .map(Route::dashboard_for)
        .unwrap_or(Route::Home);
    println!("Welcome {}! Continue at {landing}", user.full_name);
}

fn print_properties(properties: &[Property]) {
    for (i, property) in properties.iter().enumerate() {
        println!("{}. {} ({} / day)", i + 1, property.title, property.price);
        if let Some(city) = property.city() {
            println!("   City: {city}");
        }
        println!("   ID: {}  approval: {}", property.id, property.approval_status.as_str());
    }
}

fn print_bookings(bookings: &[Booking]) {
    for booking in bookings {
        println!(
            "{}  {:<28}  {:<20}  {:>10.2}  {}",
            booking.id,
            booking.property_title().unwrap_or("-"),
            booking.tenant_name().unwrap_or("-"),
            booking.total_amount,
            booking.status.as_str()
        );
    }
}

fn print_users(users: &[User]) {
    for user in users {
        println!(
            "{}  {:<24}  {:<28}  {}",
            user.id,
            user.full_name,
            user.email,
            if user.is_blocked { "blocked" } else { "active" }
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
