use crate::cli::parser::ClubAction;
use crate::config::Config;
use crate::core::clubs::ClubLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_flag};
use crate::utils::formatting::{bold, describe_flag};

pub fn handle(action: &ClubAction, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open(&cfg.database)?;

    match action {
        ClubAction::Add { name } => {
            let club = ClubLogic::create(&mut pool, name)?;
            success(format!("Club '{}' created (id {}).", club.name, club.id));
        }

        ClubAction::List => {
            let clubs = ClubLogic::list(&mut pool)?;
            if clubs.is_empty() {
                info("No clubs registered.");
            }
            for c in clubs {
                println!("{:>4}  {}", c.id, c.name);
            }
        }

        ClubAction::Show { name } => {
            let o = ClubLogic::overview(&mut pool, name)?;
            let session = match o.accepting {
                Some(flag) => format!("{}{}{}", color_for_flag(flag), describe_flag(flag), RESET),
                None => "never opened".to_string(),
            };

            println!("{}", bold(&o.club.name));
            println!("  created : {}", o.club.created_at);
            println!("  members : {} ({} admins)", o.members, o.admins);
            println!("  session : {}", session);
        }
    }

    Ok(())
}
