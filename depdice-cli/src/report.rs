use depdice_core::console;
use depdice_core::manager::PackageDetails;
use depdice_core::operations::{Pick, Usage};
use depdice_core::present;

pub fn intro() {
    println!();
    println!(
        "{}",
        console::bold("How much do you know about your dependencies? Let's pick one at random.")
    );
    println!();
}

pub fn print_pick(pick: &Pick) {
    println!(
        "OK. I chose {} from {} deduped packages!",
        console::green_bold(&pick.package.to_string()),
        console::yellow_bold(&pick.pool_size.to_string())
    );
    println!("Let me tell you a little bit about this package...");
    println!();

    match &pick.details {
        Some(details) => print_details(details),
        None => {
            eprintln!(
                "{}",
                console::red_bold(&format!(
                    "I'm sorry, I couldn't find any information about {}.",
                    pick.package
                ))
            );
            eprintln!();
        }
    }

    match &pick.usage {
        Usage::Explained(text) => println!("{}", text),
        Usage::Unavailable(message) => println!("{}", console::red_bold(message)),
    }

    println!();
    println!("Have a nice day! Run this again to learn about another package!");
}

fn print_details(details: &PackageDetails) {
    println!("{}", console::bold(&details.name));
    println!("{}", "=".repeat(details.name.chars().count()));

    if let Some(description) = details.description.as_deref() {
        println!("{}", description);
    }
    println!();

    if let Some(homepage) = details.homepage.as_deref() {
        println!("{}", console::underline(homepage));
        println!();
    }

    println!("Authors: {}", present::authors(&details.credits));
    println!("License: {}", present::license(&details.credits));
    println!("Package age: {}", present::age_from_now(details.created_at()));
    println!(
        "Version age: {}",
        present::age_from_now(details.last_modified_at())
    );
    println!();

    println!(
        "{}",
        console::bold("Here's how this package is used in your project:")
    );
    println!();
}
