pub mod image_canvas;
