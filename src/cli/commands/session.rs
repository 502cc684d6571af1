use super::load_resolver;
use crate::cli::parser::SessionAction;
use crate::config::Config;
use crate::core::session::SessionLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::authenticate;
use crate::models::coordinates::Coordinates;
use crate::ui::messages::success;
use crate::utils::colors::{RESET, color_for_flag};
use crate::utils::formatting::describe_flag;

pub fn handle(action: &SessionAction, cfg: &Config) -> AppResult<()> {
    match action {
        SessionAction::Toggle { club, token, point } => {
            let club = cfg.club_or_default(club)?;
            let anchor = Coordinates::parse(&point.lat, &point.lon)?;
            let admin = authenticate(&load_resolver(cfg)?, token)?;

            let mut pool = DbPool::open(&cfg.database)?;
            let accepting = SessionLogic::toggle(&mut pool, club, &admin.identity, anchor)?;

            if accepting {
                success(format!(
                    "Attendance for '{}' is now OPEN, anchored at {}.",
                    club, anchor
                ));
            } else {
                success(format!("Attendance for '{}' is now CLOSED.", club));
            }
            println!("state: {}", accepting);
        }

        SessionAction::State { club } => {
            let club = cfg.club_or_default(club)?;
            let mut pool = DbPool::open(&cfg.database)?;
            let accepting = SessionLogic::query(&mut pool, club)?;
            println!("state: {}", accepting);
        }

        SessionAction::Show { club } => {
            let club = cfg.club_or_default(club)?;
            let mut pool = DbPool::open(&cfg.database)?;
            let s = SessionLogic::snapshot(&mut pool, club)?;

            println!(
                "club    : {}\nsession : {}{}{}\nanchor  : {}\nupdated : {}",
                club,
                color_for_flag(s.accepting),
                describe_flag(s.accepting),
                RESET,
                s.anchor,
                s.updated_at
            );
        }
    }

    Ok(())
}
