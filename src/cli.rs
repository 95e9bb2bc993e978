/// CLI argument parsing and command handling.
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::api::{ApiError, MarketplaceApi};
use crate::config::ReferenceZone;
use crate::db;
use crate::geo::{ScreenMap, add_location_to_screens, calculate_distance};
use crate::hours::{Day, WorkingHours, validate_new_range};
use crate::sales::{SalesBoard, format_currency, format_date_for_metrics};
use crate::session::{AuthState, Session};
use crate::types::{
    AuthBody, DateRange, MapFilters, PriceRange, QueryParams, Screen, ScreenType,
};

#[derive(Parser)]
#[command(
    name = "screenboard",
    version,
    about = "Screenboard - A terminal dashboard for a digital-signage marketplace"
)]
pub struct Cli {
    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the session for 7 days
    Login {
        email: String,
        #[arg(short = 'p', long = "password")]
        password: Option<String>,
    },
    Logout,
    Whoami,
    /// Sales statistics, optionally for an inclusive date range
    Sales {
        #[arg(long = "from", requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long = "to", requires = "from")]
        to: Option<NaiveDate>,
    },
    /// List screens with their location and state
    Screens {
        #[arg(short = 't', long = "type")]
        screen_type: Option<ScreenType>,
        #[arg(long = "min-price")]
        min_price: Option<f64>,
        #[arg(long = "max-price")]
        max_price: Option<f64>,
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        #[arg(long)]
        inactive: bool,
        /// Only screens within this many km of the map center
        #[arg(short = 'r', long = "radius")]
        radius: Option<f64>,
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
    },
    /// Edit working-hours drafts and submit them
    Hours {
        #[command(subcommand)]
        command: HoursCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum HoursCommand {
    Show {
        screen: String,
    },
    Add {
        screen: String,
        day: String,
        start: String,
        end: String,
    },
    Remove {
        screen: String,
        day: String,
        index: usize,
    },
    /// Discard the local draft
    Clear {
        screen: String,
    },
    Push {
        screen: String,
    },
}

/// What a command needs from the outside world.
pub struct CommandContext<'a> {
    pub api: &'a dyn MarketplaceApi,
    pub conn: &'a Connection,
    pub zone: ReferenceZone,
    pub page_size: u32,
}

/// Execute a CLI command.
pub fn run(command: Command, ctx: &CommandContext<'_>) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            handle_login(email, password, ctx)?;
        }
        Command::Logout => {
            Session::logout(ctx.conn)?;
            println!("Sesión cerrada.");
        }
        Command::Whoami => match Session::load(ctx.conn)? {
            Some(session) => println!(
                "{} <{}> (sesión válida hasta {})",
                session.user.name,
                session.user.email,
                session.expires_at.format("%d/%m/%Y %H:%M UTC")
            ),
            None => println!("Sin sesión."),
        },
        Command::Sales { from, to } => {
            let range = from.zip(to).map(|(start, end)| DateRange { start, end });
            handle_sales(range, ctx)?;
        }
        Command::Screens {
            screen_type,
            min_price,
            max_price,
            active,
            inactive,
            radius,
            name,
        } => {
            let filters = MapFilters {
                screen_type,
                price_range: price_range(min_price, max_price),
                is_active: match (active, inactive) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                radius_km: radius,
            };
            handle_screens(filters, name, ctx)?;
        }
        Command::Hours { command } => handle_hours(command, ctx)?,
    }
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Contraseña: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_login(email: String, password: String, ctx: &CommandContext<'_>) -> Result<()> {
    let mut auth = AuthState::default();
    if !auth.login(ctx.api, ctx.conn, &AuthBody { email, password }) {
        bail!("{}", auth.error().unwrap_or("login failed"));
    }
    if let Some(user) = auth.user() {
        println!("Sesión iniciada como {} <{}>", user.name, user.email);
    }
    Ok(())
}

fn price_range(min: Option<f64>, max: Option<f64>) -> Option<PriceRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(PriceRange {
        min: min.unwrap_or(0.0),
        max: max.unwrap_or(f64::MAX),
    })
}

fn handle_sales(range: Option<DateRange>, ctx: &CommandContext<'_>) -> Result<()> {
    let sales = ctx
        .api
        .fetch_sales()
        .map_err(api_failure)?;
    let mut board = SalesBoard::new(sales);
    if let Some(range) = range {
        board.filter_in(range, ctx.zone);
    }
    for line in sales_report(&board) {
        println!("{line}");
    }
    Ok(())
}

pub fn sales_report(board: &SalesBoard) -> Vec<String> {
    let stats = board.stats();
    let mut lines = Vec::new();
    if let Some(range) = board.range() {
        lines.push(format!(
            "Período: {} - {}",
            range.start.format("%d/%m/%Y"),
            range.end.format("%d/%m/%Y")
        ));
    }
    lines.push(format!("Ventas totales:  {}", format_currency(stats.total_sales)));
    lines.push(format!("Promedio diario: {}", format_currency(stats.average_sales)));
    if stats.total_days > 0 {
        lines.push(format!(
            "Mayor venta:     {} ({})",
            format_currency(stats.max_sales.value),
            format_date_for_metrics(&stats.max_sales.date)
        ));
        lines.push(format!(
            "Menor venta:     {} ({})",
            format_currency(stats.min_sales.value),
            format_date_for_metrics(&stats.min_sales.date)
        ));
    }
    lines.push(format!("Días:            {}", stats.total_days));
    lines.push(String::new());
    for sale in board.visible() {
        lines.push(format!(
            "{:>10}  {:>14}",
            format_date_for_metrics(&sale.date),
            format_currency(sale.value)
        ));
    }
    lines
}

fn require_session(conn: &Connection) -> Result<Session> {
    Session::load(conn)?.context("Sin sesión. Ejecuta `screenboard login <email>` primero.")
}

fn load_map(
    ctx: &CommandContext<'_>,
    session: &Session,
    name: Option<String>,
) -> Result<ScreenMap> {
    let params = QueryParams {
        name,
        ..QueryParams::first_page(ctx.page_size)
    };
    let response = ctx
        .api
        .fetch_screens(session, &params)
        .map_err(api_failure)?;
    Ok(ScreenMap::new(add_location_to_screens(
        response.data,
        &mut rand::rng(),
    )))
}

fn handle_screens(
    filters: MapFilters,
    name: Option<String>,
    ctx: &CommandContext<'_>,
) -> Result<()> {
    let session = require_session(ctx.conn)?;
    let mut map = load_map(ctx, &session, name)?;
    let now = ctx.zone.now();
    map.apply_filters(filters, &now);
    for line in screen_rows(&map, &now) {
        println!("{line}");
    }
    Ok(())
}

pub fn screen_rows<Tz: chrono::TimeZone>(
    map: &ScreenMap,
    now: &chrono::DateTime<Tz>,
) -> Vec<String> {
    if map.visible().is_empty() {
        return vec!["Ninguna pantalla coincide.".to_string()];
    }
    let center = map.full_center();
    map.visible()
        .iter()
        .map(|entry| {
            let price = entry
                .screen
                .price()
                .map_or_else(|| entry.screen.price_per_day.clone(), format_currency);
            format!(
                "{:<18} {:<24} {:<7} {:>10} {:>7.2} km  {:<8}  {}",
                entry.id,
                entry.screen.name,
                entry.screen.screen_type,
                price,
                calculate_distance(&center, &entry.location),
                if entry.screen.is_active_at(now) {
                    "activa"
                } else {
                    "inactiva"
                },
                entry.location.address
            )
        })
        .collect()
}

fn parse_day(raw: &str) -> Result<Day> {
    Day::from_key(&raw.to_lowercase())
        .with_context(|| format!("Día desconocido '{raw}'. Use monday..sunday"))
}

/// Finds a screen by id, walking the listing one page at a time.
fn fetch_screen(ctx: &CommandContext<'_>, session: &Session, id: &str) -> Result<Screen> {
    let mut params = QueryParams::first_page(ctx.page_size);
    loop {
        let page = ctx.api.fetch_screens(session, &params).map_err(api_failure)?;
        let fetched = page.data.len() as u32;
        if let Some(screen) = page
            .data
            .into_iter()
            .find(|screen| screen.id.as_deref() == Some(id))
        {
            return Ok(screen);
        }
        params.offset += fetched;
        if fetched == 0 || u64::from(params.offset) >= page.total_count {
            bail!("Pantalla {id} no encontrada");
        }
    }
}

/// The local draft if any, else the screen's stored hours.
fn current_draft(screen: &str, ctx: &CommandContext<'_>) -> Result<WorkingHours> {
    if let Some(draft) = db::load_draft(screen, ctx.conn)? {
        return Ok(draft.hours);
    }
    let session = require_session(ctx.conn)?;
    Ok(fetch_screen(ctx, &session, screen)?.editable_hours())
}

fn api_failure(err: ApiError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn handle_hours(command: HoursCommand, ctx: &CommandContext<'_>) -> Result<()> {
    match command {
        HoursCommand::Show { screen } => {
            let Some(draft) = db::load_draft(&screen, ctx.conn)? else {
                println!("Sin borrador para la pantalla {screen}.");
                return Ok(());
            };
            println!(
                "Borrador de la pantalla {screen} ({})",
                draft.updated_at.format("%d/%m/%Y %H:%M")
            );
            print_hours(&draft.hours);
        }
        HoursCommand::Add {
            screen,
            day,
            start,
            end,
        } => {
            let day = parse_day(&day)?;
            let hours = current_draft(&screen, ctx)?;
            let range = validate_new_range(&hours, day, &start, &end)?;
            let hours = hours.with_range(day, range);
            db::save_draft(&screen, &hours, ctx.conn)?;
            print_hours(&hours);
        }
        HoursCommand::Remove { screen, day, index } => {
            let day = parse_day(&day)?;
            let hours = current_draft(&screen, ctx)?;
            if index >= hours.ranges(day).len() {
                bail!("{} no tiene un rango {index}", day.label());
            }
            let hours = hours.without_range(day, index);
            db::save_draft(&screen, &hours, ctx.conn)?;
            print_hours(&hours);
        }
        HoursCommand::Clear { screen } => {
            if db::delete_draft(&screen, ctx.conn)? {
                println!("Borrador descartado.");
            } else {
                println!("Sin borrador para la pantalla {screen}.");
            }
        }
        HoursCommand::Push { screen } => {
            let session = require_session(ctx.conn)?;
            let Some(draft) = db::load_draft(&screen, ctx.conn)? else {
                bail!("Sin borrador para la pantalla {screen}");
            };
            ctx.api
                .update_screen_rules(&session, &screen, &draft.hours)
                .map_err(api_failure)?;
            db::delete_draft(&screen, ctx.conn)?;
            println!("Horario de la pantalla {screen} actualizado.");
        }
    }
    Ok(())
}

fn print_hours(hours: &WorkingHours) {
    let lines = hours.display_lines();
    if lines.is_empty() {
        println!("  sin horario");
    }
    for line in lines {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::api::stub::{PASSWORD, StubApi, sale, screen};
    use crate::db::init_in_memory;
    use crate::hours::TimeRange;

    fn context<'a>(api: &'a StubApi, conn: &'a Connection) -> CommandContext<'a> {
        CommandContext {
            api,
            conn,
            zone: ReferenceZone::Fixed(FixedOffset::east_opt(0).unwrap()),
            page_size: 100,
        }
    }

    fn login(ctx: &CommandContext<'_>) {
        handle_login("ana@example.com".into(), PASSWORD.into(), ctx).unwrap();
    }

    #[test]
    fn parses_screen_filters() {
        let cli = Cli::try_parse_from([
            "screenboard",
            "screens",
            "--type",
            "indoor",
            "--min-price",
            "100",
            "--active",
            "--api-url",
            "http://example.com",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://example.com"));
        match cli.command {
            Some(Command::Screens {
                screen_type,
                min_price,
                active,
                ..
            }) => {
                assert_eq!(screen_type, Some(ScreenType::Indoor));
                assert_eq!(min_price, Some(100.0));
                assert!(active);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["screenboard", "screens", "--active", "--inactive"]).is_err());
        assert!(Cli::try_parse_from(["screenboard", "sales", "--from", "2024-01-01"]).is_err());
    }

    #[test]
    fn login_failure_is_an_error() {
        let api = StubApi::default();
        let conn = init_in_memory().unwrap();
        let ctx = context(&api, &conn);
        let err = handle_login("ana@example.com".into(), "nope".into(), &ctx).unwrap_err();
        assert_eq!(err.to_string(), "Email o contraseña incorrectos");
        login(&ctx);
        assert!(Session::load(&conn).unwrap().is_some());
    }

    #[test]
    fn sales_report_lists_filtered_sales() {
        let mut board = SalesBoard::new(vec![
            sale(1, "2024-01-01", 100.0),
            sale(2, "2024-01-02", 1300.0),
            sale(3, "2024-02-01", 50.0),
        ]);
        board.filter_in(
            DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
            ReferenceZone::Fixed(FixedOffset::east_opt(0).unwrap()),
        );
        let report = sales_report(&board);
        assert_eq!(report[0], "Período: 01/01/2024 - 31/01/2024");
        assert_eq!(report[1], "Ventas totales:  $ 1.400");
        assert_eq!(report[3], "Mayor venta:     $ 1.300 (02/01/2024)");
        assert_eq!(report.len(), 9);
    }

    #[test]
    fn screens_need_a_session() {
        let api =
            StubApi::default().with_screens(vec![screen("1", ScreenType::Indoor, "10", None)]);
        let conn = init_in_memory().unwrap();
        let ctx = context(&api, &conn);
        assert!(handle_screens(MapFilters::default(), None, &ctx).is_err());
        login(&ctx);
        assert!(handle_screens(MapFilters::default(), None, &ctx).is_ok());
    }

    #[test]
    fn screen_rows_show_state_and_address() {
        let mornings = r#"{"monday":[{"start":"08:00","end":"12:00"}]}"#;
        let api = StubApi::default().with_screens(vec![
            screen("1", ScreenType::Indoor, "1500", Some(mornings)),
            screen("2", ScreenType::Outdoor, "900", None),
        ]);
        let conn = init_in_memory().unwrap();
        let ctx = context(&api, &conn);
        login(&ctx);
        let session = require_session(&conn).unwrap();
        let map = load_map(&ctx, &session, Some("pantalla 1".into())).unwrap();
        assert_eq!(map.all().len(), 1);

        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let rows = screen_rows(&map, &monday);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("$ 1.500"));
        assert!(rows[0].contains(" activa "));
        assert!(rows[0].ends_with("Av. Corrientes 1234, CABA"));
    }

    fn add_hours(ctx: &CommandContext<'_>, day: &str, start: &str, end: &str) -> Result<()> {
        handle_hours(
            HoursCommand::Add {
                screen: "7".into(),
                day: day.into(),
                start: start.into(),
                end: end.into(),
            },
            ctx,
        )
    }

    fn tuesday_screen() -> StubApi {
        let tuesday = r#"{"tuesday":[{"start":"09:00","end":"18:00"}]}"#;
        StubApi::default().with_screens(vec![
            screen("1", ScreenType::Outdoor, "10", None),
            screen("7", ScreenType::Indoor, "10", Some(tuesday)),
        ])
    }

    #[test]
    fn first_edit_needs_the_stored_hours() {
        let api = tuesday_screen();
        let conn = init_in_memory().unwrap();
        let ctx = context(&api, &conn);
        assert!(add_hours(&ctx, "monday", "08:00", "12:00").is_err());
        assert!(db::load_draft("7", &conn).unwrap().is_none());

        login(&ctx);
        let session = require_session(&conn).unwrap();
        let paged = CommandContext { page_size: 1, ..context(&api, &conn) };
        assert_eq!(fetch_screen(&paged, &session, "7").unwrap().name, "Pantalla 7");
        assert!(fetch_screen(&paged, &session, "99").is_err());
    }

    #[test]
    fn hours_draft_lifecycle() {
        let api = tuesday_screen();
        let conn = init_in_memory().unwrap();
        let ctx = context(&api, &conn);
        login(&ctx);

        add_hours(&ctx, "Monday", "08:00", "12:00").unwrap();
        add_hours(&ctx, "monday", "14:00", "18:00").unwrap();
        assert!(add_hours(&ctx, "monday", "11:00", "15:00").is_err());
        assert!(add_hours(&ctx, "tuesday", "17:00", "19:00").is_err());
        assert!(add_hours(&ctx, "funday", "08:00", "09:00").is_err());

        let draft = db::load_draft("7", &conn).unwrap().unwrap();
        assert_eq!(draft.hours.ranges(Day::Monday).len(), 2);
        assert_eq!(draft.hours.ranges(Day::Tuesday), &[TimeRange::new("09:00", "18:00")]);

        handle_hours(
            HoursCommand::Remove {
                screen: "7".into(),
                day: "monday".into(),
                index: 0,
            },
            &ctx,
        )
        .unwrap();
        let draft = db::load_draft("7", &conn).unwrap().unwrap();
        assert_eq!(draft.hours.ranges(Day::Monday), &[TimeRange::new("14:00", "18:00")]);

        Session::logout(&conn).unwrap();
        assert!(handle_hours(HoursCommand::Push { screen: "7".into() }, &ctx).is_err());
        login(&ctx);
        handle_hours(HoursCommand::Push { screen: "7".into() }, &ctx).unwrap();
        assert!(db::load_draft("7", &conn).unwrap().is_none());
        let pushed = api.pushed.borrow();
        assert_eq!(pushed.len(), 1);
        assert_eq!(
            pushed[0].1,
            concat!(
                r#"{"monday":[{"start":"14:00","end":"18:00"}],"#,
                r#""tuesday":[{"start":"09:00","end":"18:00"}]}"#
            )
        );
    }
}
