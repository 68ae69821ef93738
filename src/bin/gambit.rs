// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal front-end for the rules engine. This binary is a stand-in for
//! the board-view and session collaborators: it turns typed coordinate
//! pairs into move requests and renders whatever the engine exposes.

#[macro_use]
extern crate clap;

use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::process;

use clap::{App, Arg, ArgMatches, SubCommand};
use rand::seq::SliceRandom;

use gambit::{Color, File, Game, PieceKind, Rank, Square};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("play")
                .about("Play an interactive two-player game on the terminal")
                .arg(
                    Arg::with_name("fen")
                        .help("FEN piece-placement field for the starting position")
                        .value_name("PLACEMENT")
                        .long("--fen")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("black")
                        .help("Black moves first (only meaningful with --fen)")
                        .long("--black"),
                ),
        )
        .subcommand(
            SubCommand::with_name("selfplay")
                .about("Watch a game of uniformly random legal moves")
                .arg(
                    Arg::with_name("moves")
                        .help("Maximum number of moves before giving up")
                        .value_name("MOVES")
                        .short("-m")
                        .long("--moves")
                        .takes_value(true),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("play") {
        run_play(matches);
    }

    if let Some(matches) = matches.subcommand_matches("selfplay") {
        run_selfplay(matches);
    }

    // Default to an interactive game from the starting position.
    play(Game::new("White", "Black"));
    process::exit(0);
}

fn game_from_matches(matches: &ArgMatches) -> Game {
    match matches.value_of("fen") {
        Some(placement) => {
            let turn = if matches.is_present("black") {
                Color::Black
            } else {
                Color::White
            };
            match Game::from_fen(placement, turn) {
                Ok(game) => game,
                Err(err) => {
                    eprintln!("invalid position: {:?}", err);
                    process::exit(1);
                }
            }
        }
        None => Game::new("White", "Black"),
    }
}

fn run_play(matches: &ArgMatches) -> ! {
    play(game_from_matches(matches));
    process::exit(0);
}

fn play(mut game: Game) {
    let stdin = io::stdin();
    println!("{}", game.board());
    loop {
        if let Some(result) = game.result() {
            println!("{}", result);
            return;
        }

        print!("{} to move> ", game.turn());
        io::stdout().flush().unwrap();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 {
            return;
        }
        let input = line.trim();
        if input == "quit" {
            return;
        }

        match parse_move(input) {
            Some((source, destination, promotion)) => {
                if !game.request_move_promoting(source, destination, promotion) {
                    println!("illegal move: {}", input);
                    continue;
                }
                println!("{}", game.board());
                if game.in_check(game.turn()) && !game.is_over() {
                    println!("{} is in check", game.turn());
                }
            }
            None => println!("moves look like e2e4 (or e7e8n to underpromote); 'quit' exits"),
        }
    }
}

fn run_selfplay(matches: &ArgMatches) -> ! {
    let cap = if matches.is_present("moves") {
        value_t_or_exit!(matches, "moves", u32)
    } else {
        200
    };

    let mut game = Game::new("White", "Black");
    let mut rng = rand::thread_rng();
    for _ in 0..cap {
        if game.is_over() {
            break;
        }

        let moves = enumerate_moves(&game);
        if moves.is_empty() {
            // The engine does not call stalemates; just stop.
            println!("no legal moves for {}", game.turn());
            break;
        }

        let &(source, destination) = moves.choose(&mut rng).unwrap();
        println!("{}: {}{}", game.turn(), source, destination);
        let accepted = game.request_move(source, destination);
        assert!(accepted, "enumerated move was rejected");
    }

    println!("{}", game.board());
    match game.result() {
        Some(result) => println!("{}", result),
        None => println!("no result after {} moves", cap),
    }
    process::exit(0);
}

fn enumerate_moves(game: &Game) -> Vec<(Square, Square)> {
    let mut moves = Vec::new();
    for &id in game.board().pieces_of(game.turn()) {
        let source = match game.board().piece(id) {
            Some(state) => state.square(),
            None => continue,
        };
        for destination in game.destinations(source) {
            moves.push((source, destination));
        }
    }
    moves
}

fn parse_square(chars: &[char]) -> Option<Square> {
    let file = File::try_from(chars[0]).ok()?;
    let rank = Rank::try_from(chars[1]).ok()?;
    Some(Square::of(file, rank))
}

fn parse_move(input: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let chars: Vec<_> = input.chars().collect();
    if chars.len() != 4 && chars.len() != 5 {
        return None;
    }

    let source = parse_square(&chars[0..2])?;
    let destination = parse_square(&chars[2..4])?;
    let promotion = if chars.len() == 5 {
        let kind = match chars[4] {
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            _ => return None,
        };
        Some(kind)
    } else {
        None
    };

    Some((source, destination, promotion))
}
