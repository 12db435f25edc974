//! Terminal client for the Tetris server.
//!
//! Connects, shows the server's high-score list, then plays in raw mode.
//! A background thread reads 196-byte state frames off the socket while
//! the main loop polls the keyboard and sends single input bytes.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, terminal};

use net_tetris::server::parse_port;
use net_tetris::types::{Phase, TetInput, FIELD_HEIGHT, FIELD_WIDTH};
use net_tetris::wire::{decode_scoreboard, StateFrame, SCOREBOARD_FRAME_LEN, STATE_FRAME_LEN};

#[derive(Parser, Debug)]
#[command(name = "net-tetris-client", about = "Play Tetris against a net-tetris server")]
struct Args {
    /// Server host.
    #[arg(short = 'i', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(short, long, default_value = "30001", value_parser = parse_port)]
    port: u16,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut stream = TcpStream::connect((args.host.as_str(), args.port))
        .with_context(|| format!("connecting to {}:{}", args.host, args.port))?;

    let mut handshake = [0u8; SCOREBOARD_FRAME_LEN];
    stream.read_exact(&mut handshake)?;
    let scores = decode_scoreboard(&handshake).map_err(anyhow::Error::from)?;

    println!("High scores on {}:{}", args.host, args.port);
    for (rank, score) in scores.iter().enumerate() {
        println!("  {:2}. {}", rank + 1, score);
    }
    println!("Press Enter to start.");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    // Any byte acknowledges the handshake.
    stream.write_all(&[0])?;

    terminal::enable_raw_mode()?;
    execute!(std::io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut stream);

    // Always try to restore terminal state.
    let _ = execute!(std::io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn run(stream: &mut TcpStream) -> Result<()> {
    let (frame_tx, frame_rx) = mpsc::channel::<StateFrame>();
    let reader = stream.try_clone()?;
    thread::spawn(move || read_frames(reader, frame_tx));

    let mut latest: Option<StateFrame> = None;

    loop {
        // Frames may outpace rendering; draw only the newest.
        let mut fresh = false;
        let mut closed = false;
        loop {
            match frame_rx.try_recv() {
                Ok(frame) => {
                    latest = Some(frame);
                    fresh = true;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }
        if fresh {
            if let Some(frame) = &latest {
                draw(frame)?;
            }
        }

        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let input = match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Left => Some(TetInput::Left),
                    KeyCode::Right => Some(TetInput::Right),
                    KeyCode::Down => Some(TetInput::Down),
                    KeyCode::Char(' ') => Some(TetInput::DownInstant),
                    KeyCode::Up | KeyCode::Char('x') => Some(TetInput::RotateCw),
                    KeyCode::Char('z') => Some(TetInput::RotateCcw),
                    KeyCode::Char('c') => Some(TetInput::Cheat),
                    KeyCode::Char('p') => Some(TetInput::Pause),
                    KeyCode::Char('r') => Some(TetInput::Restart),
                    KeyCode::Char('+') => Some(TetInput::Faster),
                    KeyCode::Char('-') => Some(TetInput::Slower),
                    _ => None,
                };
                if let Some(input) = input {
                    if stream.write_all(&[input.to_byte()]).is_err() {
                        // Server is gone; the reader thread will have seen it too.
                        return Ok(());
                    }
                }
            }
        }

        if closed && latest.as_ref().map_or(true, |f| !f.phase.is_terminal()) {
            // Connection dropped mid-game.
            return Ok(());
        }
    }
}

fn read_frames(mut stream: TcpStream, tx: mpsc::Sender<StateFrame>) {
    let mut buf = [0u8; STATE_FRAME_LEN];
    loop {
        if stream.read_exact(&mut buf).is_err() {
            return;
        }
        let Ok(frame) = StateFrame::decode(&buf) else {
            return;
        };
        if tx.send(frame).is_err() {
            return;
        }
    }
}

fn draw(frame: &StateFrame) -> Result<()> {
    let mut out = std::io::stdout();
    execute!(out, cursor::MoveTo(0, 0))?;

    let width = FIELD_WIDTH as usize;
    let mut screen = String::new();
    screen.push('+');
    screen.push_str(&"-".repeat(width));
    screen.push_str("+\r\n");
    for y in 0..FIELD_HEIGHT as usize {
        screen.push('|');
        for &cell in frame.canvas.row(y) {
            screen.push(cell as char);
        }
        screen.push_str("|\r\n");
    }
    screen.push('+');
    screen.push_str(&"-".repeat(width));
    screen.push_str("+\r\n");

    screen.push_str(&format!(
        "points {:>6}  level {}  lines to go {}   \r\n",
        frame.points, frame.level, frame.lines_to_go
    ));
    screen.push_str(match frame.phase {
        Phase::InProgress => "playing          \r\n",
        Phase::Stopped => "paused (p resume)\r\n",
        Phase::Lose => "game over (q to quit)\r\n",
        Phase::Win => "you win! (q to quit) \r\n",
    });

    out.write_all(screen.as_bytes())?;
    out.flush()?;
    Ok(())
}
