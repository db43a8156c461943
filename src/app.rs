use colored::Colorize;
use log::error;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::error::Error;
use std::sync::Arc;

use crate::catalog::{ self, CatalogLoader };
use crate::cli::Args;
use crate::conversation::{
    ChatError,
    ConversationController,
    EMPTY_SELECTION_MESSAGE,
    FOLLOW_UP_APOLOGY,
    REQUEST_PENDING_MESSAGE,
    ROUTINE_APOLOGY,
};
use crate::models::catalog::Product;
use crate::render::{ self, TextDirection };
use crate::selection::SelectionStore;

const HELP_TEXT: &str = "Commands:
  categories            List available categories
  category [name]       Filter the grid by category (no name clears it)
  search [query]        Filter the grid by a search query (no query clears it)
  list                  Show the product grid for the current filter
  select <n|name>       Toggle a product in or out of the selection
  selected              Show the current selection
  remove <n>            Remove the n-th selected product
  clear                 Clear the whole selection
  show <n|name>         Show full product details
  routine               Generate a routine for the selected products
  ask <text>            Ask a follow-up question (bare text also works)
  rtl                   Toggle right-to-left rendering
  help                  Show this help
  quit                  Exit";

pub struct App {
    loader: CatalogLoader,
    selection_store: Arc<dyn SelectionStore>,
    controller: ConversationController,
    products: Vec<Product>,
    category: String,
    query: String,
    direction: TextDirection,
}

impl App {
    pub fn new(
        loader: CatalogLoader,
        selection_store: Arc<dyn SelectionStore>,
        controller: ConversationController,
        args: &Args,
    ) -> Self {
        Self {
            loader,
            selection_store,
            controller,
            products: Vec::new(),
            category: String::new(),
            query: String::new(),
            direction: if args.rtl {
                TextDirection::Rtl
            } else {
                TextDirection::Ltr
            },
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.products = self.loader.load().await?;

        let categories = catalog::available_categories(&self.products);
        if categories.len() == 1 {
            // A single-category catalog needs no explicit choice.
            self.category = categories[0].clone();
        }

        println!("{}", "Routine Assistant".bold());
        println!("Categories: {}", categories.join(", "));
        self.show_grid().await;
        self.show_selection().await;
        println!("Type 'help' for commands.");

        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline("routine> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(&line);
                    if !self.dispatch(&line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    break;
                }
                Err(e) => {
                    error!("Readline failed: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, line: &str) -> bool {
        let (command, rest) = split_command(line);
        match command {
            "quit" | "exit" => {
                return false;
            }
            "help" => println!("{}", HELP_TEXT),
            "categories" => {
                let categories = catalog::available_categories(&self.products);
                println!("Categories: {}", categories.join(", "));
            }
            "category" => {
                self.category = rest.to_string();
                self.show_grid().await;
            }
            "search" => {
                self.query = rest.to_string();
                self.show_grid().await;
            }
            "list" => self.show_grid().await,
            "select" => self.toggle(rest).await,
            "selected" => self.show_selection().await,
            "remove" => self.remove(rest).await,
            "clear" => self.clear().await,
            "show" => self.show_details(rest),
            "routine" => self.generate_routine().await,
            "ask" => self.ask(rest).await,
            "rtl" => {
                self.direction = self.direction.toggled();
                let mode = match self.direction {
                    TextDirection::Rtl => "right-to-left",
                    TextDirection::Ltr => "left-to-right",
                };
                println!("Rendering {}", mode);
            }
            // Bare text is a follow-up question.
            _ => self.ask(line).await,
        }
        true
    }

    fn filtered(&self) -> Vec<Product> {
        catalog::filter_products(&self.products, &self.category, &self.query)
    }

    /// Resolves a product reference: a 1-based index into the current grid,
    /// or a case-insensitive name match over the full catalog.
    fn find_product(&self, reference: &str) -> Option<Product> {
        if let Ok(index) = reference.parse::<usize>() {
            let filtered = self.filtered();
            return index
                .checked_sub(1)
                .and_then(|i| filtered.get(i).cloned());
        }

        self.products
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(reference))
            .cloned()
    }

    async fn show_grid(&self) {
        if self.category.is_empty() && self.query.is_empty() {
            println!("{}", "Select a category to view products".dimmed());
            return;
        }

        let filtered = self.filtered();
        let selection = self.selection().await;
        println!("{}", render::render_grid(&filtered, &selection, self.direction));
    }

    async fn show_selection(&self) {
        let selection = self.selection().await;
        println!("{}", "Selected products:".bold());
        println!("{}", render::render_selection(&selection, self.direction));
    }

    async fn selection(&self) -> Vec<Product> {
        match self.selection_store.items().await {
            Ok(selection) => selection,
            Err(e) => {
                error!("Could not read selection: {}", e);
                Vec::new()
            }
        }
    }

    async fn toggle(&self, reference: &str) {
        let Some(product) = self.find_product(reference) else {
            println!("No product matches '{}'", reference);
            return;
        };

        match self.selection_store.toggle(&product).await {
            Ok(_) => {
                self.show_grid().await;
                self.show_selection().await;
            }
            Err(e) => error!("Could not update selection: {}", e),
        }
    }

    async fn remove(&self, reference: &str) {
        let Ok(index) = reference.parse::<usize>() else {
            println!("Usage: remove <number>");
            return;
        };

        match self.selection_store.remove(index.saturating_sub(1)).await {
            Ok(_) => {
                self.show_grid().await;
                self.show_selection().await;
            }
            Err(e) => error!("Could not update selection: {}", e),
        }
    }

    async fn clear(&self) {
        match self.selection_store.clear().await {
            Ok(_) => {
                self.show_grid().await;
                self.show_selection().await;
            }
            Err(e) => error!("Could not clear selection: {}", e),
        }
    }

    fn show_details(&self, reference: &str) {
        match self.find_product(reference) {
            Some(product) => println!("{}", render::render_details(&product, self.direction)),
            None => println!("No product matches '{}'", reference),
        }
    }

    async fn generate_routine(&self) {
        let selection = self.selection().await;
        println!("{}", "Generating your personalized routine...".dimmed());

        match self.controller.generate_routine(&selection).await {
            Ok(reply) => println!("{}", render::render_reply(&reply, self.direction)),
            Err(ChatError::EmptySelection) => println!("{}", EMPTY_SELECTION_MESSAGE.yellow()),
            Err(ChatError::RequestPending) => println!("{}", REQUEST_PENDING_MESSAGE.yellow()),
            Err(_) => println!("{}", ROUTINE_APOLOGY.red()),
        }
    }

    async fn ask(&self, question: &str) {
        if question.trim().is_empty() {
            return;
        }
        println!("{}", "Generating a response, please wait...".dimmed());

        match self.controller.ask(question).await {
            Ok(reply) => println!("{}", render::render_reply(&reply, self.direction)),
            Err(ChatError::RequestPending) => println!("{}", REQUEST_PENDING_MESSAGE.yellow()),
            Err(ChatError::EmptyQuestion) => {}
            Err(_) => println!("{}", FOLLOW_UP_APOLOGY.red()),
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}
