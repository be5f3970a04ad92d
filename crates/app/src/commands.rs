//! Terminal screens

use medbook_core::{BookingState, DoctorId, Error, FormField, HospitalId, Result};
use tracing::info;

use crate::cli::{BookArgs, Commands, DoctorsArgs, LoginArgs, RegisterArgs};
use crate::state::AppState;
use crate::viewmodel::SubmitOutcome;

pub async fn run(command: Commands, state: &AppState) -> Result<()> {
    match command {
        Commands::Hospitals => hospitals(state).await,
        Commands::Doctors(args) => doctors(state, args).await,
        Commands::Login(args) => login(state, args).await,
        Commands::Register(args) => register(state, args).await,
        Commands::Logout => {
            state.auth.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Commands::Book(args) => book(state, args).await,
        Commands::Appointments => appointments(state).await,
        Commands::Whoami => {
            whoami(state);
            Ok(())
        }
    }
}

async fn hospitals(state: &AppState) -> Result<()> {
    state.catalog.load_catalog().await?;
    let summaries = state.catalog.store().hospital_summaries();
    if summaries.is_empty() {
        println!("No hospitals available.");
        return Ok(());
    }

    for summary in summaries {
        let h = &summary.hospital;
        println!("{}  {}", h.id, h.name);
        println!(
            "    {} | rating {:.1} | {} doctor(s)",
            h.address, h.rating, summary.doctor_count
        );
    }
    Ok(())
}

async fn doctors(state: &AppState, args: DoctorsArgs) -> Result<()> {
    state.catalog.load_catalog().await?;
    let hospital_id = HospitalId::new(args.hospital);
    let catalog = state.catalog.store().snapshot();
    let hospital = catalog
        .hospital(&hospital_id)
        .ok_or_else(|| Error::NotFound(format!("hospital {}", hospital_id)))?;

    let booking = state.booking(hospital_id.clone());
    booking.select_category(args.category);
    let listings = booking.visible_doctors();

    println!("{} ({})", hospital.name, hospital.address);
    if let Some(category) = args.category {
        println!("Category: {}", category.display_name());
    }
    if listings.is_empty() {
        println!("No doctors found.");
        return Ok(());
    }

    for listing in listings {
        let d = &listing.doctor;
        println!("{}  {}", d.id, d.name);
        println!(
            "    {} | {} yrs | rating {:.1} | fee {}",
            listing.category.display_name(),
            d.experience_years,
            d.rating,
            listing.fee
        );
        let slots = d.slot_labels();
        if !slots.is_empty() {
            println!("    slots: {}", slots.join(", "));
        }
    }
    Ok(())
}

async fn login(state: &AppState, args: LoginArgs) -> Result<()> {
    let session = state.auth.login(&args.email, &args.password).await?;
    println!("Logged in as {} <{}>", session.user.name, session.user.email);
    Ok(())
}

async fn register(state: &AppState, args: RegisterArgs) -> Result<()> {
    let session = state
        .auth
        .register(&args.name, &args.email, &args.phone, &args.password)
        .await?;
    match session {
        Some(session) => println!("Registered and logged in as {}", session.user.name),
        None => println!("Registered. Log in with `medbook login`."),
    }
    Ok(())
}

async fn book(state: &AppState, args: BookArgs) -> Result<()> {
    let session = state.auth.current().ok_or(Error::AuthRequired)?;
    state.catalog.load_catalog().await?;

    let booking = state.booking(HospitalId::new(args.hospital));
    let listing = booking.select_doctor_by_id(&DoctorId::new(args.doctor))?;
    booking.update_field(
        FormField::Name,
        args.name.unwrap_or_else(|| session.user.name.clone()),
    )?;
    booking.update_field(
        FormField::Email,
        args.email.unwrap_or_else(|| session.user.email.clone()),
    )?;
    booking.update_field(FormField::Date, args.date)?;

    let slots = booking.available_slots();
    if !slots.is_empty() && !slots.iter().any(|s| *s == args.time) {
        println!(
            "Note: {} is not one of the listed slots ({})",
            args.time,
            slots.join(", ")
        );
    }
    booking.update_field(FormField::Time, args.time)?;

    let fee = booking.pinned_fee().unwrap_or(listing.fee);
    println!(
        "Booking {} ({}) for fee {}",
        listing.doctor.name,
        listing.category.display_name(),
        fee
    );

    match booking.submit().await? {
        SubmitOutcome::Booked(appointment) => {
            info!(appointment_id = %appointment.id, "Booked from terminal");
            println!(
                "Appointment {} booked for {} at {} ({}).",
                appointment.id, appointment.date, appointment.time, appointment.status
            );
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            if let BookingState::Failed(failure) = booking.state() {
                println!("Booking failed ({}); nothing was saved.", failure.kind);
            }
            Err(err)
        }
        SubmitOutcome::Discarded => Err(Error::AuthRequired),
    }
}

async fn appointments(state: &AppState) -> Result<()> {
    let list = state.appointments.refresh_current().await?;
    if list.is_empty() {
        println!("No appointments yet.");
        return Ok(());
    }

    for appt in list {
        let doctor = appt.doctor_name.as_deref().unwrap_or(appt.doctor_id.as_str());
        let hospital = appt
            .hospital_name
            .as_deref()
            .unwrap_or(appt.hospital_id.as_str());
        println!(
            "{}  {} {}  {} @ {}  fee {}  [{}]",
            appt.id, appt.date, appt.time, doctor, hospital, appt.fee, appt.status
        );
        if let Some(specialty) = &appt.specialty {
            println!("    {}", specialty);
        }
    }
    Ok(())
}

fn whoami(state: &AppState) {
    match state.auth.current() {
        Some(session) => {
            let user = &session.user;
            println!("{} <{}>", user.name, user.email);
            if let Some(phone) = &user.phone {
                println!("phone: {}", phone);
            }
            println!("user id: {}", user.id);
            println!("server: {}", state.config.api.base_url);
        }
        None => println!("Not logged in."),
    }
}
