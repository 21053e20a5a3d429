//! Command-line front desk for the reception system.
//!
//! Provides an interactive menu for signing in, opening pages through the
//! access table, and working the therapy waitlist.

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use reception_sync::models::{waitlist_form, NewOpenSlot, Priority, Specialty};
use reception_sync::waitlist::{can_edit, WaitSeverity};
use reception_sync::{
    navigate, visible_pages, Navigation, Page, ReceptionError, Result, Role, Session, Settings,
    WaitlistBoard,
};
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct ReceptionCli {
    settings: Settings,
    session: Option<Session>,
    board: WaitlistBoard,
    running: bool,
}

impl ReceptionCli {
    fn new(settings: Settings) -> Self {
        ReceptionCli {
            settings,
            session: None,
            board: WaitlistBoard::new(),
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       RECEPTION SYNC");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        match &self.session {
            Some(s) => println!(
                "\n--- Main Menu ({} / {}) ---",
                s.username,
                s.reception_name.as_deref().unwrap_or(s.role.as_str())
            ),
            None => println!("\n--- Main Menu (signed out) ---"),
        }
        println!("1. Sign in");
        println!("2. Sign out");
        println!("3. List my pages");
        println!("4. Open page");
        println!("5. Add patient to waitlist");
        println!("6. Release open slot");
        println!("7. View matches");
        println!("8. Waitlist statistics");
        println!("9. Schedule patient into slot");
        println!("10. Search waitlist");
        println!("11. Run demo");
        println!("12. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            Ok(default.unwrap_or("").to_string())
        } else {
            Ok(input.to_string())
        }
    }

    fn get_int_input(&self, prompt: &str, default: Option<i32>) -> Result<i32> {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref())?;

            if let Ok(value) = input.parse::<i32>() {
                return Ok(value);
            }
            println!("Please enter a valid number");
        }
    }

    fn get_time_input(&self, prompt: &str, default: &str) -> Result<NaiveTime> {
        loop {
            let input = self.get_input(prompt, Some(default))?;
            if let Ok(time) = NaiveTime::parse_from_str(&input, "%H:%M") {
                return Ok(time);
            }
            println!("Please enter a time as HH:MM");
        }
    }

    fn get_date_input(&self, prompt: &str, default: NaiveDate) -> Result<NaiveDate> {
        let default = default.format("%Y-%m-%d").to_string();
        loop {
            let input = self.get_input(prompt, Some(&default))?;
            if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
                return Ok(date);
            }
            println!("Please enter a date as YYYY-MM-DD");
        }
    }

    fn pick_specialty(&self) -> Result<Specialty> {
        println!("\nSpecialties:");
        for (i, specialty) in Specialty::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, specialty);
        }
        let choice = self.get_int_input("Select specialty", Some(1))?;
        let index = (choice.max(1) as usize - 1).min(Specialty::ALL.len() - 1);
        Ok(Specialty::ALL[index])
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn sign_in(&mut self) -> Result<()> {
        println!("\n--- Sign In ---");
        println!("  1. Choose role and reception");
        println!("  2. Paste login response JSON");
        let session = if self.get_int_input("Select", Some(1))? == 2 {
            let body = self.get_input("Response body", None)?;
            Session::from_login_json(&body)?
        } else {
            let role = Role::from_string(&self.get_input("Role", Some("recepcao"))?)?;
            let username = self.get_input("Username", Some("recepcao1002"))?;
            if role.is_admin_variant() {
                Session::admin(username, role)
            } else {
                Session::reception(username, self.get_input("Reception id", Some("1002"))?)
            }
        };

        info!(user = %session.username, role = session.role.as_str(), "signed in");
        println!("\nWelcome, {}", session.username);
        self.session = Some(session);
        Ok(())
    }

    fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user = %session.username, "signed out");
            println!("\nGoodbye, {}", session.username);
        } else {
            println!("\nNobody is signed in");
        }
    }

    fn list_pages(&self) {
        let pages = visible_pages(self.session.as_ref());
        if pages.is_empty() {
            println!("\nSign in to see your pages ({})", self.settings.login_path);
            return;
        }
        println!("\n--- Pages ---");
        for page in pages {
            println!("  {}", page);
        }
    }

    /// Run the router for `page` and report where the user ends up.
    fn open(&self, page: Page) -> bool {
        match navigate(self.session.as_ref(), &page.requirement()) {
            Navigation::Render => true,
            Navigation::RedirectToLogin => {
                println!("\nNot signed in, redirected to {}", self.settings.login_path);
                false
            }
            Navigation::RedirectToLanding => {
                println!(
                    "\nNo access to {}, redirected to {}",
                    page.title(),
                    self.settings.landing_path
                );
                false
            }
        }
    }

    fn open_page(&self) -> Result<()> {
        let path = self.get_input("Path", Some(Page::Dashboard.path()))?;
        let page = Page::from_path(&path)?;
        if self.open(page) {
            println!("\nShowing {}", page);
        }
        Ok(())
    }

    fn ensure_editor(&self) -> bool {
        if !self.open(Page::Waitlist) {
            return false;
        }
        if !can_edit(self.session.as_ref(), &self.settings) {
            println!("\nThe waitlist is read-only for your reception");
            return false;
        }
        true
    }

    fn add_patient(&mut self) -> Result<()> {
        if !self.ensure_editor() {
            return Ok(());
        }
        println!("\n--- Add to Waitlist ---");

        let name = self.get_input("Patient name", None)?;
        let specialty = self.pick_specialty()?;
        let therapist = self.get_input("Preferred therapist (blank for any)", Some(""))?;
        let shift = self.get_input("Preferred shift", Some("Qualquer horário"))?;
        let requested_on = self.get_date_input("Request date", self.today())?;
        let requested_by = self.get_input("Requested by", None)?;
        let priority = self.get_input("Priority (alta/media/baixa)", Some("media"))?;
        let notes = self.get_input("Notes", Some(""))?;

        let form = waitlist_form(
            &name,
            specialty.label(),
            &therapist,
            &shift,
            requested_on,
            &requested_by,
            &priority,
            &notes,
        )?;
        let today = self.today();
        let entry = self.board.add_entry(form, today)?;
        println!(
            "\n{} added ({} days waiting, priority {})",
            entry.patient_name,
            entry.wait_days,
            entry.priority.name()
        );
        println!("Matches now: {}", self.board.matches().len());
        Ok(())
    }

    fn release_slot(&mut self) -> Result<()> {
        if !self.ensure_editor() {
            return Ok(());
        }
        println!("\n--- Release Open Slot ---");

        let specialty = self.pick_specialty()?;
        let therapist = self.get_input("Therapist", None)?;
        let date = self.get_date_input("Date", self.today() + Duration::days(1))?;
        let start_time = self.get_time_input("Start", "09:00")?;
        let end_time = self.get_time_input("End", "10:00")?;
        let room = self.get_input("Room", Some(""))?;
        let notes = self.get_input("Notes", Some(""))?;
        let created_by = self
            .session
            .as_ref()
            .map(|s| s.username.clone())
            .unwrap_or_default();

        let slot = self.board.add_slot(NewOpenSlot {
            specialty,
            therapist,
            date,
            start_time,
            end_time,
            room,
            notes,
            created_by,
        })?;
        println!(
            "\nSlot released: {} {} {} ({})",
            slot.date, slot.start_time.format("%H:%M"), slot.therapist, slot.shift
        );
        println!("Matches now: {}", self.board.matches().len());
        Ok(())
    }

    fn view_matches(&self) {
        if !self.open(Page::Waitlist) {
            return;
        }
        let matches = self.board.matches();
        if matches.is_empty() {
            println!("\nNo matches between waitlist and open slots");
            return;
        }

        println!("\n--- Matches ({}) ---", matches.len());
        for m in matches {
            println!(
                "\n{} {} - {} ({} min) | {} | {} ({})",
                m.slot.date,
                m.slot.start_time.format("%H:%M"),
                m.slot.end_time.format("%H:%M"),
                m.slot.duration_minutes(),
                m.slot.specialty,
                m.slot.therapist,
                m.slot.shift
            );
            println!("    slot ID: {}...", short_id(&m.slot.id));
            for (rank, candidate) in m.candidates.iter().enumerate() {
                let marker = match WaitSeverity::from_days(candidate.wait_days) {
                    WaitSeverity::Long => "!!",
                    WaitSeverity::Moderate => "! ",
                    WaitSeverity::Short => "  ",
                };
                println!(
                    "  {}{}. [{:5}] {:20} {:3} days  (ID: {}...)",
                    marker,
                    rank + 1,
                    candidate.priority.name(),
                    candidate.patient_name,
                    candidate.wait_days,
                    short_id(&candidate.id)
                );
            }
        }
    }

    fn view_stats(&self) {
        if !self.open(Page::Waitlist) {
            return;
        }
        let stats = self.board.stats();
        println!("\n--- Waitlist Statistics ---");
        println!("  Waiting patients: {}", stats.total_waiting);
        println!("  High priority: {}", stats.high_priority);
        println!("  Available slots: {}", stats.available_slots);
        println!("  Matches found: {}", stats.matches_found);
        println!("  Average wait: {} days", stats.average_wait_days);
    }

    /// Resolve a possibly shortened id against the board.
    fn find_id<'a, I>(ids: I, prefix: &str) -> Option<String>
    where
        I: Iterator<Item = &'a str>,
    {
        let hits: Vec<&str> = ids.filter(|id| id.starts_with(prefix)).collect();
        match hits.as_slice() {
            [single] => Some(single.to_string()),
            _ => None,
        }
    }

    fn schedule(&mut self) -> Result<()> {
        if !self.ensure_editor() {
            return Ok(());
        }
        if self.board.matches().is_empty() {
            println!("\nNo matches to schedule");
            return Ok(());
        }
        self.view_matches();

        let slot_prefix = self.get_input("\nSlot ID", None)?;
        let entry_prefix = self.get_input("Patient ID", None)?;
        let slot_id = Self::find_id(self.board.slots().iter().map(|s| s.id.as_str()), &slot_prefix)
            .ok_or(ReceptionError::SlotNotFound(slot_prefix))?;
        let entry_id =
            Self::find_id(self.board.entries().iter().map(|e| e.id.as_str()), &entry_prefix)
                .ok_or(ReceptionError::EntryNotFound(entry_prefix))?;

        self.board.schedule(&entry_id, &slot_id)?;
        println!("\nPatient scheduled, slot booked");
        Ok(())
    }

    fn search(&self) -> Result<()> {
        if !self.open(Page::Waitlist) {
            return Ok(());
        }
        let term = self.get_input("Search", Some(""))?;
        let only = self.get_input("Only specialty (blank for all)", Some(""))?;
        let specialty = if only.is_empty() {
            None
        } else {
            Some(Specialty::from_string(&only)?)
        };

        let hits = self.board.filter(&term, specialty);
        println!("\n--- {} patient(s) ---", hits.len());
        for entry in hits {
            println!(
                "  {:20} {:20} {:16} {:5} {:3} days",
                entry.patient_name,
                entry.specialty.label(),
                entry.shift_preference.label(),
                entry.priority.name(),
                entry.wait_days
            );
        }
        Ok(())
    }

    fn run_demo(&mut self) -> Result<()> {
        println!("\n--- Running Demo ---");

        let today = self.today();
        let mut board = WaitlistBoard::new();

        board.add_slot(NewOpenSlot {
            specialty: Specialty::Fonoaudiologia,
            therapist: "Dra. Maria Silva".to_string(),
            date: today + Duration::days(1),
            start_time: on_the_hour(9)?,
            end_time: on_the_hour(10)?,
            room: "Sala Fono 01".to_string(),
            notes: "Horário liberado por cancelamento".to_string(),
            created_by: "recepcao103".to_string(),
        })?;
        board.add_slot(NewOpenSlot {
            specialty: Specialty::Fisioterapia,
            therapist: "Dr. Carlos Oliveira".to_string(),
            date: today + Duration::days(2),
            start_time: on_the_hour(14)?,
            end_time: on_the_hour(15)?,
            room: "Sala Fisio 02".to_string(),
            notes: String::new(),
            created_by: "recepcao108".to_string(),
        })?;

        let patients = [
            ("Ana Clara Santos", "Fonoaudiologia", "", "Qualquer horário", 15, "alta"),
            ("Lucas Ferreira", "Fonoaudiologia", "Dr. Outro", "Manhã", 40, "alta"),
            ("Beatriz Rocha", "Fonoaudiologia", "", "Manhã", 20, "media"),
            ("Joao Pedro Lima", "Fisioterapia", "Dr. Carlos Oliveira", "Tarde", 10, "media"),
            ("Maria Eduarda Costa", "Terapia Ocupacional", "", "Qualquer horário", 5, "baixa"),
        ];
        for (name, specialty, therapist, shift, days, priority) in patients {
            let form = waitlist_form(
                name,
                specialty,
                therapist,
                shift,
                today - Duration::days(days),
                "Recepcao 1002",
                priority,
                "",
            )?;
            board.add_entry(form, today)?;
        }

        println!("Seeded {}", board);
        println!("\nRanked candidates per slot:");
        for m in board.matches() {
            println!(
                "\n  {} {} with {}",
                m.slot.specialty,
                m.slot.start_time.format("%H:%M"),
                m.slot.therapist
            );
            for candidate in &m.candidates {
                println!(
                    "    [{:5}] {:20} {} days",
                    candidate.priority.name(),
                    candidate.patient_name,
                    candidate.wait_days
                );
            }
        }

        println!("\nNote: Lucas Ferreira waits longest but wants another therapist,");
        println!("so Ana Clara (high priority) comes before Beatriz (medium).");

        let admin = Session::admin("demo", Role::Admin);
        let desk = Session::reception("recepcao103", "103");
        println!("\nAccess check for {}:", Page::Waitlist);
        println!("  admin          -> {:?}", navigate(Some(&admin), &Page::Waitlist.requirement()));
        println!("  reception 103  -> {:?}", navigate(Some(&desk), &Page::Waitlist.requirement()));
        println!("  signed out     -> {:?}", navigate(None, &Page::Waitlist.requirement()));

        let priorities = board
            .entries()
            .iter()
            .filter(|e| e.priority == Priority::High)
            .count();
        println!("\nHigh-priority patients on the demo board: {}", priorities);

        self.board = board;
        Ok(())
    }

    fn dispatch(&mut self, choice: i32) -> Result<()> {
        match choice {
            1 => self.sign_in()?,
            2 => self.sign_out(),
            3 => self.list_pages(),
            4 => self.open_page()?,
            5 => self.add_patient()?,
            6 => self.release_slot()?,
            7 => self.view_matches(),
            8 => self.view_stats(),
            9 => self.schedule()?,
            10 => self.search()?,
            11 => self.run_demo()?,
            12 => {
                self.running = false;
                println!("\nGoodbye!");
            }
            _ => println!("Invalid choice"),
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.print_header();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(11))?;
            match self.dispatch(choice) {
                Ok(()) => {}
                // Terminal gone: nothing left to talk to.
                Err(ReceptionError::Io(e)) => return Err(ReceptionError::Io(e)),
                Err(e) => {
                    error!(error = %e, "operation failed");
                    println!("\nError: {}", e);
                }
            }
        }
        Ok(())
    }
}

/// First eight characters of an id, or the whole id when shorter.
fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}

fn on_the_hour(hour: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, 0, 0).ok_or(ReceptionError::InvalidTimeWindow)
}

fn main() -> Result<()> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut cli = ReceptionCli::new(settings);
    cli.run()
}
