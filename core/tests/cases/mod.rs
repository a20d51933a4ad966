mod config_and_factory;
mod control_rods;
mod pressurizer;
mod primary_loop;
mod runner;
mod secondary_loop;
mod steam_path;
