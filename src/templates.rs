use maud::{DOCTYPE, Markup, html};

use crate::{entities::movie, ranking::RankedMovie, tmdb::SearchCandidate};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn catalog_page(movies: &[RankedMovie], notice: Option<&str>) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-10" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    (notice_banner(notice))

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "Your collection is empty. Add a movie to get started." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for ranked in movies {
                                (movie_card(ranked))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, error: Option<&str>, notice: Option<&str>) -> String {
    page(
        "Add Movie",
        narrow(html! {
            h1 class="text-2xl font-bold text-gray-900" { "Add a Movie" }
            (notice_banner(notice))

            form class="mt-8 space-y-6" method="post" action="/add" {
                div {
                    label class="block text-sm font-medium text-gray-700" for="movie_title" { "Movie Title" }
                    input class=(INPUT_CLASS) name="movie_title" id="movie_title" value=(title) required;
                    (field_error(error))
                }
                button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
            }
            (back_link())
        }),
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate]) -> String {
    page(
        "Select Movie",
        narrow(html! {
            h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
            p class="mt-2 text-gray-600" { "Results for \"" (query) "\"" }

            @if candidates.is_empty() {
                p class="mt-6 text-gray-600" { "No movies matched that title." }
                a class="mt-4 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Try another search" }
            } @else {
                ul class="mt-6 divide-y divide-gray-200" {
                    @for candidate in candidates {
                        li class="py-3" {
                            a class="text-blue-600 hover:text-blue-800" href=(format!("/find?id={}", candidate.id)) {
                                (candidate_label(candidate))
                            }
                        }
                    }
                }
            }
            (back_link())
        }),
    )
}

pub fn edit_page(movie: &movie::Model, rating: &str, review: &str, error: Option<&str>) -> String {
    let action = format!("/edit?id={}", movie.id);

    page(
        "Edit Movie",
        narrow(html! {
            h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
            p class="mt-2 text-gray-600" { "Edit movie rating" }

            form class="mt-8 space-y-6" method="post" action=(action) {
                div {
                    label class="block text-sm font-medium text-gray-700" for="new_rating" { "Your rating out of 10 e.g 7.5" }
                    input class=(INPUT_CLASS) name="new_rating" id="new_rating" value=(rating);
                    (field_error(error))
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="new_review" { "Your review" }
                    input class=(INPUT_CLASS) name="new_review" id="new_review" value=(review);
                }
                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
            (back_link())
        }),
    )
}

pub fn error_page(message: &str, retry_href: Option<&str>) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        @if let Some(href) = retry_href {
                            p class="mt-2 text-sm text-gray-500" { "This is usually temporary. Please try again in a moment." }
                            a class="mt-6 mr-6 inline-block text-blue-600 hover:text-blue-800" href=(href) { "Try again" }
                        }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn narrow(inner: Markup) -> Markup {
    html! {
        div class="min-h-screen bg-gray-50" {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" { (inner) }
            }
        }
    }
}

fn movie_card(ranked: &RankedMovie) -> Markup {
    let movie = &ranked.movie;

    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if let Some(img_url) = &movie.img_url {
                img class="w-24 rounded" src=(img_url) alt=(movie.title);
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        span class="mr-2 text-gray-400" { (ranked.ranking) "." }
                        (movie.title)
                        @if let Some(year) = movie.year {
                            span class="ml-2 font-normal text-gray-500" { "(" (year) ")" }
                        }
                    }
                    span class="text-lg font-semibold text-amber-600" {
                        @match movie.rating {
                            Some(rating) => { (format!("{rating:.1}")) },
                            None => { "unrated" },
                        }
                    }
                }
                @if let Some(review) = movie.review.as_deref().filter(|r| !r.is_empty()) {
                    p class="mt-2 italic text-gray-700" { "\"" (review) "\"" }
                }
                @if let Some(description) = &movie.description {
                    p class="mt-2 text-sm text-gray-600" { (description) }
                }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

fn candidate_label(candidate: &SearchCandidate) -> String {
    let title = if candidate.title.is_empty() { "Untitled" } else { candidate.title.as_str() };
    match candidate.year() {
        Some(year) => format!("{title} - {year}"),
        None => title.to_string(),
    }
}

fn notice_banner(notice: Option<&str>) -> Markup {
    html! {
        @if let Some(notice) = notice {
            div class="mt-6 rounded-md border border-amber-300 bg-amber-50 px-4 py-3 text-sm text-amber-800" role="status" {
                (notice)
            }
        }
    }
}

fn field_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            p class="mt-2 text-sm text-red-600" { (error) }
        }
    }
}

fn back_link() -> Markup {
    html! {
        a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/" { "Back to collection" }
    }
}
