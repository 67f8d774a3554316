mod convolve;
mod scene;
