use super::load_resolver;
use crate::cli::parser::MemberAction;
use crate::config::Config;
use crate::core::members::MemberLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::identity::authenticate;
use crate::models::identity::Identity;
use crate::models::member::Member;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_optional;
use std::path::Path;

fn print_member(m: &Member) {
    println!(
        "{:>4}  {:<24} {:<28} attendance={:<4} admin={:<5} last={}",
        m.id,
        m.name,
        m.identity.value(),
        m.attendance,
        m.is_admin,
        colorize_optional(m.last_check_in.as_deref())
    );
}

pub fn handle(action: &MemberAction, cfg: &Config) -> AppResult<()> {
    match action {
        MemberAction::Get { club, token, json } => {
            let club = cfg.club_or_default(club)?;
            let who = authenticate(&load_resolver(cfg)?, token)?;

            let mut pool = DbPool::open(&cfg.database)?;
            let member = MemberLogic::resolve(&mut pool, club, &who.identity)?;

            if *json {
                let out = serde_json::to_string_pretty(&member)
                    .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
                println!("{}", out);
            } else {
                print_member(&member);
            }
        }

        MemberAction::New { club, token, name } => {
            let club = cfg.club_or_default(club)?;
            let who = authenticate(&load_resolver(cfg)?, token)?;
            let display_name = name.as_deref().unwrap_or(&who.display_name);

            let mut pool = DbPool::open(&cfg.database)?;
            let member = MemberLogic::register(&mut pool, club, &who.identity, display_name)?;

            success(format!(
                "Registered {} <{}> in club '{}'.",
                member.name, member.identity, club
            ));
        }

        MemberAction::Import { club, file } => {
            let club = cfg.club_or_default(club)?;
            let mut pool = DbPool::open(&cfg.database)?;
            let created = MemberLogic::register_batch(&mut pool, club, Path::new(file))?;
            success(format!(
                "Imported {} members into club '{}'.",
                created.len(),
                club
            ));
        }

        MemberAction::Admin {
            club,
            identity,
            revoke,
        } => {
            let club = cfg.club_or_default(club)?;
            let identity = Identity::parse(identity)?;
            let mut pool = DbPool::open(&cfg.database)?;
            let member = MemberLogic::set_admin(&mut pool, club, &identity, !*revoke)?;

            if member.is_admin {
                success(format!("{} is now an admin of '{}'.", member.name, club));
            } else {
                success(format!("{} is no longer an admin of '{}'.", member.name, club));
            }
        }

        MemberAction::List { club } => {
            let club = cfg.club_or_default(club)?;
            let mut pool = DbPool::open(&cfg.database)?;
            let members = MemberLogic::list(&mut pool, club)?;

            if members.is_empty() {
                info(format!("No members in club '{}'.", club));
            }
            for m in &members {
                print_member(m);
            }
        }
    }

    Ok(())
}
